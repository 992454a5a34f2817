use super::keys::ConstraintKey;
use crate::validator::{Check, Validator};
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A function transforming a composed validator into a stricter one.
///
/// Refinements run after the generated validator (and an optional `schema` intersection) and may
/// wrap it arbitrarily — most commonly with a forwarded cross-field [Check].
pub type RefineFn = Arc<dyn Fn(Validator) -> Validator + Send + Sync>;

/// A constraint value together with its optional custom error message.
///
/// Every constraint accepts either a bare value or a value-message pair; both convert into this
/// normalized form on ingestion so nothing downstream re-inspects the shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint<T> {
    pub value: T,
    pub message: Option<String>,
}

/// A declared numeric bound before a type dispatcher coerces it.
///
/// Which representation a bound is compared in depends on the type of the validator it ends up
/// attached to: the number creator reads any bound as a float, the bigint creator requires an
/// integral bound, and the date creator reads integers as millisecond timestamps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    Int(i64),
    Float(f64),
    Date(DateTime<FixedOffset>),
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::Int(value)
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::Float(value)
    }
}

impl From<DateTime<FixedOffset>> for Bound {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Bound::Date(value)
    }
}

impl From<bool> for Constraint<bool> {
    fn from(value: bool) -> Self {
        Constraint {
            value,
            message: None,
        }
    }
}

impl From<(bool, &str)> for Constraint<bool> {
    fn from((value, message): (bool, &str)) -> Self {
        Constraint {
            value,
            message: Some(message.to_string()),
        }
    }
}

impl From<usize> for Constraint<usize> {
    fn from(value: usize) -> Self {
        Constraint {
            value,
            message: None,
        }
    }
}

impl From<(usize, &str)> for Constraint<usize> {
    fn from((value, message): (usize, &str)) -> Self {
        Constraint {
            value,
            message: Some(message.to_string()),
        }
    }
}

impl From<i64> for Constraint<Bound> {
    fn from(value: i64) -> Self {
        Constraint {
            value: value.into(),
            message: None,
        }
    }
}

impl From<(i64, &str)> for Constraint<Bound> {
    fn from((value, message): (i64, &str)) -> Self {
        Constraint {
            value: value.into(),
            message: Some(message.to_string()),
        }
    }
}

impl From<f64> for Constraint<Bound> {
    fn from(value: f64) -> Self {
        Constraint {
            value: value.into(),
            message: None,
        }
    }
}

impl From<(f64, &str)> for Constraint<Bound> {
    fn from((value, message): (f64, &str)) -> Self {
        Constraint {
            value: value.into(),
            message: Some(message.to_string()),
        }
    }
}

impl From<DateTime<FixedOffset>> for Constraint<Bound> {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Constraint {
            value: value.into(),
            message: None,
        }
    }
}

impl From<(DateTime<FixedOffset>, &str)> for Constraint<Bound> {
    fn from((value, message): (DateTime<FixedOffset>, &str)) -> Self {
        Constraint {
            value: value.into(),
            message: Some(message.to_string()),
        }
    }
}

impl From<Regex> for Constraint<Regex> {
    fn from(value: Regex) -> Self {
        Constraint {
            value,
            message: None,
        }
    }
}

impl From<(Regex, &str)> for Constraint<Regex> {
    fn from((value, message): (Regex, &str)) -> Self {
        Constraint {
            value,
            message: Some(message.to_string()),
        }
    }
}

/// An explicit type tag disambiguating which type dispatcher an options value targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeTag {
    Number,
    BigInt,
    Boolean,
    Date,
    String,
    Object,
    Array,
}

/// The declarative validation configuration of one field or argument.
///
/// An options value is a bag of optional constraints. Which concrete type it validates is never
/// declared redundantly: the set of present keys is matched against each type dispatcher's
/// recognized key set during compilation, with the optional [type tag](ValidateOptions::type_tag)
/// excluding dispatchers for other types up front.
///
/// Options are assembled with chained builder methods:
///
/// ```
/// use graphql_validate::options::ValidateOptions;
///
/// let options = ValidateOptions::new().trim().regex_str(r"^\d{3}-\d{3}-\d{4}$").length(12);
/// ```
#[derive(Clone, Default)]
pub struct ValidateOptions {
    pub(crate) schema: Option<Validator>,
    pub(crate) refine: Option<RefineFn>,
    pub(crate) checks: Vec<Check>,
    pub(crate) type_tag: Option<TypeTag>,
    pub(crate) integer: Option<Constraint<bool>>,
    pub(crate) min_value: Option<Constraint<Bound>>,
    pub(crate) max_value: Option<Constraint<Bound>>,
    pub(crate) trim: bool,
    pub(crate) non_empty: Option<Constraint<bool>>,
    pub(crate) email: Option<Constraint<bool>>,
    pub(crate) url: Option<Constraint<bool>>,
    pub(crate) uuid: Option<Constraint<bool>>,
    pub(crate) length: Option<Constraint<usize>>,
    pub(crate) min_length: Option<Constraint<usize>>,
    pub(crate) max_length: Option<Constraint<usize>>,
    pub(crate) regex: Option<Constraint<Regex>>,
    pub(crate) items: Option<Box<ValidateOptions>>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intersect the generated validator with an externally-authored one.
    pub fn schema(mut self, schema: Validator) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Transform the composed validator once it's been generated.
    pub fn refine(mut self, refine: impl Fn(Validator) -> Validator + Send + Sync + 'static) -> Self {
        self.refine = Some(Arc::new(refine));
        self
    }

    /// Append a custom predicate check. Checks run in declaration order after every other stage.
    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Pin the options to one type dispatcher.
    pub fn type_tag(mut self, tag: TypeTag) -> Self {
        self.type_tag = Some(tag);
        self
    }

    /// Require a number to have no fractional part.
    pub fn integer(mut self, constraint: impl Into<Constraint<bool>>) -> Self {
        self.integer = Some(constraint.into());
        self
    }

    /// Set an inclusive lower bound on a number, bigint, or date.
    pub fn min_value(mut self, constraint: impl Into<Constraint<Bound>>) -> Self {
        self.min_value = Some(constraint.into());
        self
    }

    /// Set an inclusive upper bound on a number, bigint, or date.
    pub fn max_value(mut self, constraint: impl Into<Constraint<Bound>>) -> Self {
        self.max_value = Some(constraint.into());
        self
    }

    /// Trim surrounding whitespace off a string before the remaining constraints see it.
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Reject empty strings and arrays.
    pub fn non_empty(mut self, constraint: impl Into<Constraint<bool>>) -> Self {
        self.non_empty = Some(constraint.into());
        self
    }

    /// Require a string to be a well-formed e-mail address.
    pub fn email(mut self, constraint: impl Into<Constraint<bool>>) -> Self {
        self.email = Some(constraint.into());
        self
    }

    /// Require a string to parse as a URL.
    pub fn url(mut self, constraint: impl Into<Constraint<bool>>) -> Self {
        self.url = Some(constraint.into());
        self
    }

    /// Require a string to parse as a UUID.
    pub fn uuid(mut self, constraint: impl Into<Constraint<bool>>) -> Self {
        self.uuid = Some(constraint.into());
        self
    }

    /// Require an exact string or array length.
    pub fn length(mut self, constraint: impl Into<Constraint<usize>>) -> Self {
        self.length = Some(constraint.into());
        self
    }

    /// Set an inclusive lower bound on string or array length.
    pub fn min_length(mut self, constraint: impl Into<Constraint<usize>>) -> Self {
        self.min_length = Some(constraint.into());
        self
    }

    /// Set an inclusive upper bound on string or array length.
    pub fn max_length(mut self, constraint: impl Into<Constraint<usize>>) -> Self {
        self.max_length = Some(constraint.into());
        self
    }

    /// Require a string to match a pattern.
    pub fn regex(mut self, constraint: impl Into<Constraint<Regex>>) -> Self {
        self.regex = Some(constraint.into());
        self
    }

    /// Require a string to match a pattern given as source text.
    ///
    /// Panics if the pattern doesn't compile, which makes it a declaration-site convenience only;
    /// use [`regex`](ValidateOptions::regex) with a prebuilt [Regex] to handle pattern errors.
    pub fn regex_str(self, pattern: &str) -> Self {
        self.regex(Regex::new(pattern).expect("regex pattern should compile"))
    }

    /// Declare the validation options of each array item.
    pub fn items(mut self, items: ValidateOptions) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    /// The set of keys present on this options value, in declaration order.
    pub fn present_keys(&self) -> Vec<ConstraintKey> {
        let mut keys = Vec::new();
        if self.schema.is_some() {
            keys.push(ConstraintKey::Schema);
        }
        if self.refine.is_some() {
            keys.push(ConstraintKey::Refine);
        }
        if !self.checks.is_empty() {
            keys.push(ConstraintKey::Check);
        }
        if self.type_tag.is_some() {
            keys.push(ConstraintKey::Type);
        }
        if self.integer.is_some() {
            keys.push(ConstraintKey::Integer);
        }
        if self.min_value.is_some() {
            keys.push(ConstraintKey::MinValue);
        }
        if self.max_value.is_some() {
            keys.push(ConstraintKey::MaxValue);
        }
        if self.trim {
            keys.push(ConstraintKey::Trim);
        }
        if self.non_empty.is_some() {
            keys.push(ConstraintKey::NonEmpty);
        }
        if self.email.is_some() {
            keys.push(ConstraintKey::Email);
        }
        if self.url.is_some() {
            keys.push(ConstraintKey::Url);
        }
        if self.uuid.is_some() {
            keys.push(ConstraintKey::Uuid);
        }
        if self.length.is_some() {
            keys.push(ConstraintKey::Length);
        }
        if self.min_length.is_some() {
            keys.push(ConstraintKey::MinLength);
        }
        if self.max_length.is_some() {
            keys.push(ConstraintKey::MaxLength);
        }
        if self.regex.is_some() {
            keys.push(ConstraintKey::Regex);
        }
        if self.items.is_some() {
            keys.push(ConstraintKey::Items);
        }
        keys
    }
}

impl fmt::Debug for ValidateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .present_keys()
            .iter()
            .map(|key| key.to_string())
            .collect();
        f.debug_tuple("ValidateOptions").field(&keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraints_normalize_value_and_message_pairs() {
        let bare: Constraint<usize> = 3.into();
        assert_eq!(bare.value, 3);
        assert_eq!(bare.message, None);

        let with_message: Constraint<usize> = (3, "too long").into();
        assert_eq!(with_message.value, 3);
        assert_eq!(with_message.message.as_deref(), Some("too long"));
    }

    #[test]
    fn bounds_coerce_from_declared_values() {
        let int: Constraint<Bound> = 5.into();
        assert_eq!(int.value, Bound::Int(5));

        let float: Constraint<Bound> = (1.5, "too small").into();
        assert_eq!(float.value, Bound::Float(1.5));
        assert_eq!(float.message.as_deref(), Some("too small"));
    }

    #[test]
    fn present_keys_report_declaration_shape() {
        let options = ValidateOptions::new()
            .trim()
            .length(12)
            .regex_str(r"^\d+$")
            .check(crate::validator::Check::new(|_| true));
        assert_eq!(
            options.present_keys(),
            vec![
                ConstraintKey::Check,
                ConstraintKey::Trim,
                ConstraintKey::Length,
                ConstraintKey::Regex,
            ]
        );
    }
}
