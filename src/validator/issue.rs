use crate::error::{Error, ErrorType};
use std::fmt;

/// The location of a validation issue within a nested argument structure.
///
/// A path is a list of object keys and array indices leading from the argument object down to the
/// value that violated a constraint, and is displayed in its dotted form, e.g. `input.nested.0.id`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// Create an empty path, which addresses the validated value itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path out of a list of object keys.
    ///
    /// This is the form forwarded checks address sub-fields with, hence it only supports key
    /// segments. Index segments only ever appear when array items report nested issues.
    pub fn from_keys(keys: &[&str]) -> Self {
        Path {
            segments: keys
                .iter()
                .map(|key| PathSegment::Key((*key).to_string()))
                .collect(),
        }
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment)
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.segments
                .iter()
                .map(|segment| segment.to_string())
                .collect::<Vec<_>>()
                .join(".")
        )
    }
}

/// One step of a [Path]: an object key or an array index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single violated constraint: where it was violated and the message describing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub path: Path,
    pub message: String,
}

impl Issue {
    pub fn new(path: Path, message: impl Into<String>) -> Self {
        Issue {
            path,
            message: message.into(),
        }
    }

    /// Create an issue addressing the validated value itself.
    pub fn root(message: impl Into<String>) -> Self {
        Issue::new(Path::new(), message)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The ordered collection of issues one `parse` run produced.
///
/// Issues are collected across the entire value tree rather than stopping at the first failure, so
/// a rejected argument object reports every violated constraint of every argument at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueList {
    pub issues: Vec<Issue>,
}

impl IssueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list out of a single issue.
    pub fn of(issue: Issue) -> Self {
        IssueList {
            issues: vec![issue],
        }
    }

    /// Add an issue to the list of issues.
    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Append another list's issues in order.
    pub fn extend(&mut self, other: IssueList) {
        self.issues.extend(other.issues);
    }

    /// Append another list's issues, each re-rooted under the given segment.
    ///
    /// This is how arrays and objects qualify the issues their children report: an item validator
    /// knows nothing about its position, so the parent prefixes the index or key on the way up.
    pub fn extend_under(&mut self, other: IssueList, segment: PathSegment) {
        for mut issue in other.issues {
            issue.path.segments.insert(0, segment.clone());
            self.issues.push(issue);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Convert the collected issues into this crate's [Error] structure.
    ///
    /// Each issue becomes one `- ` prefixed line of the error's context.
    pub fn to_error(&self) -> Error {
        let mut context = String::new();
        let mut is_first = true;
        for issue in &self.issues {
            if is_first {
                is_first = false;
            } else {
                context.push('\n');
            }
            context.push_str("- ");
            context.push_str(&issue.to_string());
        }
        Error::new_with_context(
            "Input failed validation".to_string(),
            context,
            Some(ErrorType::Validation),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_path_display() {
        let mut path = Path::from_keys(&["input", "nested"]);
        path.push(PathSegment::Index(0));
        path.push(PathSegment::Key("id".to_string()));
        assert_eq!(path.to_string(), "input.nested.0.id");
    }

    #[test]
    fn root_issues_display_without_path() {
        let issue = Issue::root("Must provide either phone number or email address");
        assert_eq!(
            issue.to_string(),
            "Must provide either phone number or email address"
        );
    }

    #[test]
    fn issues_render_into_error_context() {
        let mut issues = IssueList::new();
        issues.add(Issue::new(
            Path::from_keys(&["email"]),
            "invalid email address",
        ));
        let nested = IssueList::of(Issue::new(
            Path::from_keys(&["id"]),
            "Invalid length: Expected >=2 but received 1",
        ));
        issues.extend_under(nested, PathSegment::Key("input".to_string()));

        let error = issues.to_error();
        assert_eq!(
            error.print(true),
            "Validation Error: Input failed validation\n\
             - email: invalid email address\n\
             - input.id: Invalid length: Expected >=2 but received 1"
        );
    }
}
