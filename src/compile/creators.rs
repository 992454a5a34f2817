use super::compile::refine;
use crate::options::{Bound, Constraint, ConstraintKey, TypeTag, ValidateOptions};
use crate::validator::{Action, BoundValue, Primitive, Validator};

// Recognized key sets, one per type dispatcher. An options value matches a dispatcher when its
// present keys are a subset of the dispatcher's set and its type tag, if any, names the
// dispatcher's type.

pub(crate) const BASE_VALIDATIONS: &[ConstraintKey] = &[
    ConstraintKey::Refine,
    ConstraintKey::Schema,
    ConstraintKey::Check,
];

pub(crate) const NUMBER_VALIDATIONS: &[ConstraintKey] = &[
    ConstraintKey::Refine,
    ConstraintKey::Schema,
    ConstraintKey::Check,
    ConstraintKey::Integer,
    ConstraintKey::MaxValue,
    ConstraintKey::MinValue,
    ConstraintKey::Type,
];

pub(crate) const BIGINT_VALIDATIONS: &[ConstraintKey] = &[
    ConstraintKey::Refine,
    ConstraintKey::Schema,
    ConstraintKey::Check,
    ConstraintKey::MaxValue,
    ConstraintKey::MinValue,
    ConstraintKey::Type,
];

pub(crate) const BOOLEAN_VALIDATIONS: &[ConstraintKey] = &[
    ConstraintKey::Refine,
    ConstraintKey::Schema,
    ConstraintKey::Check,
    ConstraintKey::Type,
];

pub(crate) const DATE_VALIDATIONS: &[ConstraintKey] = &[
    ConstraintKey::Refine,
    ConstraintKey::Schema,
    ConstraintKey::Check,
    ConstraintKey::MaxValue,
    ConstraintKey::MinValue,
    ConstraintKey::Type,
];

pub(crate) const STRING_VALIDATIONS: &[ConstraintKey] = &[
    ConstraintKey::Refine,
    ConstraintKey::Schema,
    ConstraintKey::Check,
    ConstraintKey::Trim,
    ConstraintKey::NonEmpty,
    ConstraintKey::Email,
    ConstraintKey::Length,
    ConstraintKey::MaxLength,
    ConstraintKey::MinLength,
    ConstraintKey::Regex,
    ConstraintKey::Type,
    ConstraintKey::Url,
    ConstraintKey::Uuid,
];

pub(crate) const ARRAY_VALIDATIONS: &[ConstraintKey] = &[
    ConstraintKey::Refine,
    ConstraintKey::Schema,
    ConstraintKey::Check,
    ConstraintKey::Items,
    ConstraintKey::NonEmpty,
    ConstraintKey::Length,
    ConstraintKey::MaxLength,
    ConstraintKey::MinLength,
    ConstraintKey::Type,
];

pub(crate) const OBJECT_VALIDATIONS: &[ConstraintKey] = &[
    ConstraintKey::Refine,
    ConstraintKey::Schema,
    ConstraintKey::Check,
    ConstraintKey::Type,
];

/// The concrete type creators in their fixed dispatch order. Arrays dispatch separately since
/// their `items` sub-options recurse through the compiler itself.
pub(crate) const VALIDATION_CREATORS: &[fn(&ValidateOptions) -> Option<Validator>] = &[
    create_number_validator,
    create_bigint_validator,
    create_boolean_validator,
    create_date_validator,
    create_string_validator,
    create_object_validator,
];

fn matches(options: &ValidateOptions, tag: TypeTag, recognized: &[ConstraintKey]) -> bool {
    if let Some(declared) = options.type_tag {
        if declared != tag {
            return false;
        }
    }
    options
        .present_keys()
        .iter()
        .all(|key| recognized.contains(key))
}

/// Whether the options' keys are drawn only from the type-agnostic base set.
pub(crate) fn is_base_options(options: &ValidateOptions) -> bool {
    options
        .present_keys()
        .iter()
        .all(|key| BASE_VALIDATIONS.contains(key))
}

/// Whether the options conform to the array dispatcher.
pub fn is_array_options(options: &ValidateOptions) -> bool {
    if let Some(declared) = options.type_tag {
        if declared != TypeTag::Array {
            return false;
        }
    }
    options
        .present_keys()
        .iter()
        .all(|key| ARRAY_VALIDATIONS.contains(key))
}

fn float_bound(constraint: &Constraint<Bound>) -> (BoundValue, Option<String>) {
    let bound = match constraint.value {
        Bound::Int(given) => given as f64,
        Bound::Float(given) => given,
        Bound::Date(given) => given.timestamp_millis() as f64,
    };
    (BoundValue::Float(bound), constraint.message.clone())
}

// A bigint bound must be integral; a creator offered anything else drops out of the
// candidate set.
fn bigint_bound(constraint: &Constraint<Bound>) -> Option<(BoundValue, Option<String>)> {
    match constraint.value {
        Bound::Int(given) => Some((BoundValue::Int(given as i128), constraint.message.clone())),
        Bound::Float(_) | Bound::Date(_) => None,
    }
}

fn date_bound(constraint: &Constraint<Bound>) -> (BoundValue, Option<String>) {
    let millis = match constraint.value {
        Bound::Int(given) => given,
        Bound::Float(given) => given as i64,
        Bound::Date(given) => given.timestamp_millis(),
    };
    (BoundValue::Timestamp(millis), constraint.message.clone())
}

pub(crate) fn create_number_validator(options: &ValidateOptions) -> Option<Validator> {
    if !matches(options, TypeTag::Number, NUMBER_VALIDATIONS) {
        return None;
    }

    let mut validator = Validator::Primitive(Primitive::Number);

    if let Some(integer) = &options.integer {
        if integer.value {
            validator = validator.pipe(Action::Integer(integer.message.clone()));
        }
    }

    if let Some(min) = &options.min_value {
        let (bound, message) = float_bound(min);
        validator = validator.pipe(Action::MinValue(bound, message));
    }

    if let Some(max) = &options.max_value {
        let (bound, message) = float_bound(max);
        validator = validator.pipe(Action::MaxValue(bound, message));
    }

    Some(refine(validator, Some(options)))
}

pub(crate) fn create_bigint_validator(options: &ValidateOptions) -> Option<Validator> {
    if !matches(options, TypeTag::BigInt, BIGINT_VALIDATIONS) {
        return None;
    }

    let mut validator = Validator::Primitive(Primitive::BigInt);

    if let Some(min) = &options.min_value {
        let (bound, message) = bigint_bound(min)?;
        validator = validator.pipe(Action::MinValue(bound, message));
    }

    if let Some(max) = &options.max_value {
        let (bound, message) = bigint_bound(max)?;
        validator = validator.pipe(Action::MaxValue(bound, message));
    }

    Some(refine(validator, Some(options)))
}

pub(crate) fn create_boolean_validator(options: &ValidateOptions) -> Option<Validator> {
    if !matches(options, TypeTag::Boolean, BOOLEAN_VALIDATIONS) {
        return None;
    }
    Some(refine(Validator::Primitive(Primitive::Boolean), Some(options)))
}

pub(crate) fn create_date_validator(options: &ValidateOptions) -> Option<Validator> {
    if !matches(options, TypeTag::Date, DATE_VALIDATIONS) {
        return None;
    }

    let mut validator = Validator::Primitive(Primitive::Date);

    if let Some(min) = &options.min_value {
        let (bound, message) = date_bound(min);
        validator = validator.pipe(Action::MinValue(bound, message));
    }

    if let Some(max) = &options.max_value {
        let (bound, message) = date_bound(max);
        validator = validator.pipe(Action::MaxValue(bound, message));
    }

    Some(refine(validator, Some(options)))
}

pub(crate) fn create_string_validator(options: &ValidateOptions) -> Option<Validator> {
    if !matches(options, TypeTag::String, STRING_VALIDATIONS) {
        return None;
    }

    let mut validator = Validator::Primitive(Primitive::String);

    if options.trim {
        validator = validator.pipe(Action::Trim);
    }

    if let Some(non_empty) = &options.non_empty {
        if non_empty.value {
            validator = validator.pipe(Action::NonEmpty(non_empty.message.clone()));
        }
    }

    if let Some(email) = &options.email {
        if email.value {
            validator = validator.pipe(Action::Email(email.message.clone()));
        }
    }

    if let Some(url) = &options.url {
        if url.value {
            validator = validator.pipe(Action::Url(url.message.clone()));
        }
    }

    if let Some(uuid) = &options.uuid {
        if uuid.value {
            validator = validator.pipe(Action::Uuid(uuid.message.clone()));
        }
    }

    if let Some(length) = &options.length {
        validator = validator.pipe(Action::Length(length.value, length.message.clone()));
    }

    if let Some(min_length) = &options.min_length {
        validator = validator.pipe(Action::MinLength(
            min_length.value,
            min_length.message.clone(),
        ));
    }

    if let Some(max_length) = &options.max_length {
        validator = validator.pipe(Action::MaxLength(
            max_length.value,
            max_length.message.clone(),
        ));
    }

    if let Some(regex) = &options.regex {
        validator = validator.pipe(Action::Regex(regex.value.clone(), regex.message.clone()));
    }

    Some(refine(validator, Some(options)))
}

pub(crate) fn create_object_validator(options: &ValidateOptions) -> Option<Validator> {
    if !matches(options, TypeTag::Object, OBJECT_VALIDATIONS) {
        return None;
    }
    Some(refine(Validator::Primitive(Primitive::Object), Some(options)))
}
