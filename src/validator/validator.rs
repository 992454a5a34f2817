use super::issue::{Issue, IssueList, Path, PathSegment};
use chrono::DateTime;
use futures::future::BoxFuture;
use futures::FutureExt;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// The ordered per-key validators of an object validator.
///
/// Entries preserve field-declaration order so that issues are reported in a stable order. Keys
/// without an entry pass through untouched, making every object validator a loose one.
pub type Entries = Vec<(String, Validator)>;

/// The thunk a lazy validator resolves through at execution time.
pub type LazyThunk = Arc<dyn Fn() -> Validator + Send + Sync>;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9+_-]+(?:\.[a-z0-9+_-]+)*@[a-z0-9][a-z0-9-]*(?:\.[a-z0-9][a-z0-9-]*)+$")
        .expect("e-mail pattern should compile")
});

/// An executable validator over JSON values.
///
/// A validator accepts or rejects a runtime value, optionally coercing it, and on rejection
/// produces one or more path-qualified [issues](Issue). Validators are immutable once built and
/// cheap to clone, so one compiled validator graph is safely shared across concurrent requests.
#[derive(Clone)]
pub enum Validator {
    /// Accepts any value untouched.
    Unknown,
    /// Accepts values of one primitive shape.
    Primitive(Primitive),
    /// Runs a base validator, then applies constraint actions to its output in order.
    Pipe(Box<Validator>, Vec<Action>),
    /// Accepts arrays whose every item passes the item validator.
    Array(Box<Validator>),
    /// Accepts objects, validating the keys named by the entries and passing others through.
    Entries(Arc<Entries>),
    /// Resolves the actual validator through a thunk at execution time.
    ///
    /// This is the indirection that makes self-referential and mutually recursive input types
    /// work: the thunk looks the target validator up only once a value is actually parsed, at
    /// which point the referenced type has been fully built.
    Lazy(LazyThunk),
    /// Accepts values that both validators accept, feeding the first's output into the second.
    Intersect(Box<Validator>, Box<Validator>),
    /// Accepts values that any one of the candidate validators accepts.
    Union(Vec<Validator>),
    /// Accepts null in place of the inner validator's shape.
    Nullish(Box<Validator>),
}

/// The primitive shapes a typed validator can require.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Number,
    BigInt,
    Boolean,
    Date,
    String,
    Object,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::Number => "Number",
            Primitive::BigInt => "BigInt",
            Primitive::Boolean => "Boolean",
            Primitive::Date => "Date",
            Primitive::String => "String",
            Primitive::Object => "Object",
        };
        write!(f, "{name}")
    }
}

impl Primitive {
    fn check(&self, value: &Value) -> Option<String> {
        let matches = match self {
            Primitive::Number => value.is_number(),
            Primitive::BigInt => bigint_of(value).is_some(),
            Primitive::Boolean => value.is_boolean(),
            Primitive::Date => date_millis(value).is_some(),
            Primitive::String => value.is_string(),
            Primitive::Object => value.is_object(),
        };
        if matches {
            None
        } else {
            Some(format!(
                "Invalid type: Expected {} but received {}",
                self,
                received(value)
            ))
        }
    }
}

/// A bound a value is compared against, coerced to the representation of the validator's type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundValue {
    Float(f64),
    Int(i128),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Float(x) => write!(f, "{x}"),
            BoundValue::Int(x) => write!(f, "{x}"),
            BoundValue::Timestamp(x) => write!(f, "{x}"),
        }
    }
}

impl BoundValue {
    /// Compare a value against this bound, returning `None` when the value has no comparable
    /// representation. The preceding primitive stage guarantees the shape, so an incomparable
    /// value has already been reported there.
    fn compare(&self, value: &Value) -> Option<std::cmp::Ordering> {
        match self {
            BoundValue::Float(bound) => value
                .as_f64()
                .and_then(|given| given.partial_cmp(bound)),
            BoundValue::Int(bound) => bigint_of(value).map(|given| given.cmp(bound)),
            BoundValue::Timestamp(bound) => date_millis(value).map(|given| given.cmp(bound)),
        }
    }
}

/// A custom predicate attached to a validator.
///
/// Predicates are either synchronous or return a deferred boolean; both forms carry an optional
/// custom error message and an optional forward path that re-roots the resulting issue at a
/// sub-field, which is how cross-field checks point at the field they are really about.
#[derive(Clone)]
pub struct Check {
    func: CheckFn,
    message: Option<String>,
    forward: Path,
}

#[derive(Clone)]
enum CheckFn {
    Sync(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
    Async(Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>),
}

impl Check {
    /// Create a check from a synchronous predicate.
    pub fn new(func: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Check {
            func: CheckFn::Sync(Arc::new(func)),
            message: None,
            forward: Path::new(),
        }
    }

    /// Create a check from a predicate returning a deferred boolean.
    pub fn async_fn<F>(func: impl Fn(Value) -> F + Send + Sync + 'static) -> Self
    where
        F: std::future::Future<Output = bool> + Send + 'static,
    {
        Check {
            func: CheckFn::Async(Arc::new(move |value| func(value).boxed())),
            message: None,
            forward: Path::new(),
        }
    }

    /// Attach a custom error message to this check.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Re-root the issue this check produces at the given sub-path.
    pub fn forward(mut self, keys: &[&str]) -> Self {
        self.forward = Path::from_keys(keys);
        self
    }

    async fn run(&self, value: &Value) -> bool {
        match &self.func {
            CheckFn::Sync(func) => func(value),
            CheckFn::Async(func) => func(value.clone()).await,
        }
    }
}

/// One constraint stage of a [Validator::Pipe].
///
/// Actions run in order on the base validator's output. An action that doesn't apply to the
/// value's shape is a no-op; the base stage has already reported shape mismatches.
#[derive(Clone)]
pub enum Action {
    Trim,
    Integer(Option<String>),
    MinValue(BoundValue, Option<String>),
    MaxValue(BoundValue, Option<String>),
    Length(usize, Option<String>),
    MinLength(usize, Option<String>),
    MaxLength(usize, Option<String>),
    NonEmpty(Option<String>),
    Email(Option<String>),
    Url(Option<String>),
    Uuid(Option<String>),
    Regex(Regex, Option<String>),
    Check(Check),
}

impl Action {
    async fn apply(&self, value: &mut Value, issues: &mut IssueList) {
        match self {
            Action::Trim => {
                if let Value::String(text) = value {
                    *text = text.trim().to_string();
                }
            }
            Action::Integer(message) => {
                if let Some(given) = value.as_f64() {
                    if given.fract() != 0.0 {
                        issues.add(Issue::root(custom_or(
                            message,
                            format!("Invalid integer: Received {}", received(value)),
                        )));
                    }
                }
            }
            Action::MinValue(bound, message) => {
                if let Some(std::cmp::Ordering::Less) = bound.compare(value) {
                    issues.add(Issue::root(custom_or(
                        message,
                        format!(
                            "Invalid value: Expected >={} but received {}",
                            bound,
                            received(value)
                        ),
                    )));
                }
            }
            Action::MaxValue(bound, message) => {
                if let Some(std::cmp::Ordering::Greater) = bound.compare(value) {
                    issues.add(Issue::root(custom_or(
                        message,
                        format!(
                            "Invalid value: Expected <={} but received {}",
                            bound,
                            received(value)
                        ),
                    )));
                }
            }
            Action::Length(expected, message) => {
                if let Some(given) = length_of(value) {
                    if given != *expected {
                        issues.add(Issue::root(custom_or(
                            message,
                            format!("Invalid length: Expected {expected} but received {given}"),
                        )));
                    }
                }
            }
            Action::MinLength(expected, message) => {
                if let Some(given) = length_of(value) {
                    if given < *expected {
                        issues.add(Issue::root(custom_or(
                            message,
                            format!("Invalid length: Expected >={expected} but received {given}"),
                        )));
                    }
                }
            }
            Action::MaxLength(expected, message) => {
                if let Some(given) = length_of(value) {
                    if given > *expected {
                        issues.add(Issue::root(custom_or(
                            message,
                            format!("Invalid length: Expected <={expected} but received {given}"),
                        )));
                    }
                }
            }
            Action::NonEmpty(message) => {
                if let Some(0) = length_of(value) {
                    issues.add(Issue::root(custom_or(
                        message,
                        "Invalid length: Expected !=0 but received 0".to_string(),
                    )));
                }
            }
            Action::Email(message) => {
                if let Value::String(text) = value {
                    if !EMAIL_RE.is_match(text) {
                        issues.add(Issue::root(custom_or(
                            message,
                            format!("Invalid email: Received {}", received(value)),
                        )));
                    }
                }
            }
            Action::Url(message) => {
                if let Value::String(text) = value {
                    if url::Url::parse(text).is_err() {
                        issues.add(Issue::root(custom_or(
                            message,
                            format!("Invalid URL: Received {}", received(value)),
                        )));
                    }
                }
            }
            Action::Uuid(message) => {
                if let Value::String(text) = value {
                    if uuid::Uuid::parse_str(text).is_err() {
                        issues.add(Issue::root(custom_or(
                            message,
                            format!("Invalid UUID: Received {}", received(value)),
                        )));
                    }
                }
            }
            Action::Regex(pattern, message) => {
                if let Value::String(text) = value {
                    if !pattern.is_match(text) {
                        issues.add(Issue::root(custom_or(
                            message,
                            format!(
                                "Invalid format: Expected {} but received {}",
                                pattern,
                                received(value)
                            ),
                        )));
                    }
                }
            }
            Action::Check(check) => {
                if !check.run(value).await {
                    let message = check.message.clone().unwrap_or_else(|| {
                        format!("Invalid input: Received {}", received(value))
                    });
                    issues.add(Issue::new(check.forward.clone(), message));
                }
            }
        }
    }
}

impl Validator {
    /// Append a constraint action, flattening nested pipes.
    pub fn pipe(self, action: Action) -> Self {
        match self {
            Validator::Pipe(base, mut actions) => {
                actions.push(action);
                Validator::Pipe(base, actions)
            }
            base => Validator::Pipe(Box::new(base), vec![action]),
        }
    }

    /// Append a custom predicate check.
    pub fn with_check(self, check: Check) -> Self {
        self.pipe(Action::Check(check))
    }

    /// Wrap this validator so that null bypasses it.
    pub fn nullish(self) -> Self {
        Validator::Nullish(Box::new(self))
    }

    /// Build an array validator over an item validator.
    pub fn array(item: Validator) -> Self {
        Validator::Array(Box::new(item))
    }

    /// Build a loose object validator from ordered per-key validators.
    pub fn entries(entries: Entries) -> Self {
        Validator::Entries(Arc::new(entries))
    }

    /// Intersect this validator with another one, feeding this one's output into the other.
    pub fn intersect(self, other: Validator) -> Self {
        Validator::Intersect(Box::new(self), Box::new(other))
    }

    /// Build a validator that resolves through a thunk at execution time.
    pub fn lazy(thunk: impl Fn() -> Validator + Send + Sync + 'static) -> Self {
        Validator::Lazy(Arc::new(thunk))
    }

    /// Execute this validator against a value.
    ///
    /// On success the returned value is the validated and possibly coerced input, which is what a
    /// wrapped resolver receives in place of the raw arguments. On failure every violated
    /// constraint across the whole value tree is reported, each qualified with the dotted path of
    /// the value that violated it.
    pub fn parse<'v>(&'v self, value: &'v Value) -> BoxFuture<'v, Result<Value, IssueList>> {
        async move {
            let outcome = self.outcome(value).await;
            if outcome.issues.is_empty() {
                Ok(outcome
                    .value
                    .expect("an issue-free parse always produces a value"))
            } else {
                Err(outcome.issues)
            }
        }
        .boxed()
    }

    /// The internal execution step, tracking whether the value matched this validator's shape.
    ///
    /// A shape mismatch yields no output value and stops dependent stages: pipe actions don't run
    /// on a value of the wrong shape. Nested failures inside a matching shape keep the (partial)
    /// output value, so later stages — cross-field checks in particular — still run and report,
    /// and a union can tell which candidate the value was actually meant for.
    fn outcome<'v>(&'v self, value: &'v Value) -> BoxFuture<'v, ParseOutcome> {
        async move {
            match self {
                Validator::Unknown => ParseOutcome::typed(value.clone()),
                Validator::Primitive(primitive) => match primitive.check(value) {
                    None => ParseOutcome::typed(value.clone()),
                    Some(message) => ParseOutcome::untyped(IssueList::of(Issue::root(message))),
                },
                Validator::Pipe(base, actions) => {
                    let base_outcome = base.outcome(value).await;
                    let mut issues = base_outcome.issues;
                    match base_outcome.value {
                        None => ParseOutcome { value: None, issues },
                        Some(mut current) => {
                            for action in actions {
                                action.apply(&mut current, &mut issues).await;
                            }
                            ParseOutcome {
                                value: Some(current),
                                issues,
                            }
                        }
                    }
                }
                Validator::Array(item) => match value {
                    Value::Array(values) => {
                        let mut issues = IssueList::new();
                        let mut parsed_items = Vec::with_capacity(values.len());
                        for (index, entry) in values.iter().enumerate() {
                            let outcome = item.outcome(entry).await;
                            issues.extend_under(outcome.issues, PathSegment::Index(index));
                            parsed_items.push(outcome.value.unwrap_or_else(|| entry.clone()));
                        }
                        ParseOutcome {
                            value: Some(Value::Array(parsed_items)),
                            issues,
                        }
                    }
                    _ => ParseOutcome::untyped(IssueList::of(Issue::root(format!(
                        "Invalid type: Expected Array but received {}",
                        received(value)
                    )))),
                },
                Validator::Entries(entries) => match value {
                    Value::Object(map) => {
                        let mut issues = IssueList::new();
                        let mut parsed_map = map.clone();
                        for (key, validator) in entries.iter() {
                            let outcome = match map.get(key) {
                                Some(entry) => validator.outcome(entry).await,
                                None => validator.outcome(&Value::Null).await,
                            };
                            issues.extend_under(outcome.issues, PathSegment::Key(key.clone()));
                            if let Some(parsed) = outcome.value {
                                if map.contains_key(key) {
                                    parsed_map.insert(key.clone(), parsed);
                                }
                            }
                        }
                        ParseOutcome {
                            value: Some(Value::Object(parsed_map)),
                            issues,
                        }
                    }
                    _ => ParseOutcome::untyped(IssueList::of(Issue::root(format!(
                        "Invalid type: Expected Object but received {}",
                        received(value)
                    )))),
                },
                Validator::Lazy(thunk) => {
                    let target = thunk();
                    target.outcome(value).await
                }
                Validator::Intersect(first, second) => {
                    let first_outcome = first.outcome(value).await;
                    let mut issues = first_outcome.issues;
                    match first_outcome.value {
                        Some(parsed) => {
                            let second_outcome = second.outcome(&parsed).await;
                            issues.extend(second_outcome.issues);
                            ParseOutcome {
                                value: second_outcome.value,
                                issues,
                            }
                        }
                        None => {
                            // Still run the second side so one rejection doesn't hide the other's.
                            let second_outcome = second.outcome(value).await;
                            issues.extend(second_outcome.issues);
                            ParseOutcome {
                                value: None,
                                issues,
                            }
                        }
                    }
                }
                Validator::Union(candidates) => {
                    let mut typed_failure: Option<ParseOutcome> = None;
                    for candidate in candidates {
                        let outcome = candidate.outcome(value).await;
                        if outcome.issues.is_empty() {
                            return outcome;
                        }
                        if outcome.value.is_some() && typed_failure.is_none() {
                            typed_failure = Some(outcome);
                        }
                    }
                    // The candidate whose shape the value actually matched carries the precise
                    // issues; without one, no candidate was meant for this value at all.
                    match typed_failure {
                        Some(outcome) => outcome,
                        None => ParseOutcome::untyped(IssueList::of(Issue::root(format!(
                            "Invalid input: Received {}",
                            received(value)
                        )))),
                    }
                }
                Validator::Nullish(inner) => {
                    if value.is_null() {
                        ParseOutcome::typed(Value::Null)
                    } else {
                        inner.outcome(value).await
                    }
                }
            }
        }
        .boxed()
    }
}

struct ParseOutcome {
    /// The validated, possibly coerced value; absent when the input didn't match the validator's
    /// shape at all.
    value: Option<Value>,
    issues: IssueList,
}

impl ParseOutcome {
    fn typed(value: Value) -> Self {
        ParseOutcome {
            value: Some(value),
            issues: IssueList::new(),
        }
    }

    fn untyped(issues: IssueList) -> Self {
        ParseOutcome {
            value: None,
            issues,
        }
    }
}

/// This implementation is necessary to circuit break circular validators.
/// Lazy validators may resolve to themselves, so Debug never follows the thunk.
impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Unknown => write!(f, "Unknown"),
            Validator::Primitive(primitive) => f.debug_tuple("Primitive").field(primitive).finish(),
            Validator::Pipe(base, actions) => f
                .debug_struct("Pipe")
                .field("base", base)
                .field("actions", &actions.len())
                .finish(),
            Validator::Array(item) => f.debug_tuple("Array").field(item).finish(),
            Validator::Entries(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
                f.debug_tuple("Entries").field(&keys).finish()
            }
            Validator::Lazy(_) => write!(f, "Lazy"),
            Validator::Intersect(first, second) => f
                .debug_tuple("Intersect")
                .field(first)
                .field(second)
                .finish(),
            Validator::Union(candidates) => f.debug_tuple("Union").field(candidates).finish(),
            Validator::Nullish(inner) => f.debug_tuple("Nullish").field(inner).finish(),
        }
    }
}

/// Renders a value the way issue messages refer to it.
pub(crate) fn received(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(given) => given.to_string(),
        Value::Number(given) => given.to_string(),
        Value::String(given) => format!("{given:?}"),
        Value::Array(_) => "Array".to_string(),
        Value::Object(_) => "Object".to_string(),
    }
}

fn custom_or(message: &Option<String>, fallback: String) -> String {
    message.clone().unwrap_or(fallback)
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(text) => Some(text.chars().count()),
        Value::Array(values) => Some(values.len()),
        _ => None,
    }
}

/// Reads a value as an arbitrary-precision integer. Accepts integral JSON numbers as well as
/// integer strings, the common wire shape of big integer scalars.
pub(crate) fn bigint_of(value: &Value) -> Option<i128> {
    match value {
        Value::Number(number) => {
            if let Some(given) = number.as_i64() {
                Some(given as i128)
            } else {
                number.as_u64().map(|given| given as i128)
            }
        }
        Value::String(text) => {
            let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
            if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
                text.parse::<i128>().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Reads a value as a date, returning milliseconds since the Unix epoch. Accepts RFC 3339 strings
/// and numeric timestamps.
pub(crate) fn date_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|parsed| parsed.timestamp_millis()),
        _ => None,
    }
}
