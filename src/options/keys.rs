use std::fmt;

/// The name of one recognized option of [`ValidateOptions`](super::ValidateOptions).
///
/// Key sets drive type dispatch during compilation: every type creator declares the exact set of
/// keys it recognizes, and an options value matches a creator when its present keys are a subset
/// of that set. Keys display under the names users declare them with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKey {
    Schema,
    Refine,
    Check,
    Type,
    Integer,
    MinValue,
    MaxValue,
    Trim,
    NonEmpty,
    Email,
    Url,
    Uuid,
    Length,
    MinLength,
    MaxLength,
    Regex,
    Items,
}

impl fmt::Display for ConstraintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKey::Schema => "schema",
            ConstraintKey::Refine => "refine",
            ConstraintKey::Check => "check",
            ConstraintKey::Type => "type",
            ConstraintKey::Integer => "integer",
            ConstraintKey::MinValue => "minValue",
            ConstraintKey::MaxValue => "maxValue",
            ConstraintKey::Trim => "trim",
            ConstraintKey::NonEmpty => "nonEmpty",
            ConstraintKey::Email => "email",
            ConstraintKey::Url => "url",
            ConstraintKey::Uuid => "uuid",
            ConstraintKey::Length => "length",
            ConstraintKey::MinLength => "minLength",
            ConstraintKey::MaxLength => "maxLength",
            ConstraintKey::Regex => "regex",
            ConstraintKey::Items => "items",
        };
        write!(f, "{name}")
    }
}

/// Joins key names for error messages, e.g. `(minLength, integer)`.
pub(crate) fn print_keys(keys: &[ConstraintKey]) -> String {
    keys.iter()
        .map(|key| key.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
