use super::creators::{is_array_options, is_base_options, VALIDATION_CREATORS};
use crate::error::{Error, ErrorType, Result};
use crate::options::{print_keys, ValidateOptions};
use crate::validator::{Action, Validator};

/// Applies the shared post-processing stages to a generated validator.
///
/// The stages run in a fixed order on every type dispatcher's output: an optional intersection
/// with an externally-authored `schema`, an optional `refine` transformation, and finally the
/// custom checks in declaration order. Checks therefore only execute once the structural and
/// schema stages have accepted the value.
pub fn refine(validator: Validator, options: Option<&ValidateOptions>) -> Validator {
    let options = match options {
        Some(options) => options,
        None => return validator,
    };

    let mut validator = validator;

    if let Some(schema) = &options.schema {
        validator = validator.intersect(schema.clone());
    }

    if let Some(refine_fn) = &options.refine {
        validator = refine_fn(validator);
    }

    for check in &options.checks {
        validator = validator.with_check(check.clone());
    }

    validator
}

/// Combines candidate validators into the final one.
///
/// More than one candidate means the options were ambiguous over several types; the result then
/// accepts a value satisfying any one candidate. A non-required validator additionally lets null
/// bypass validation entirely.
pub fn combine(validators: Vec<Validator>, required: bool) -> Validator {
    let union = if validators.len() > 1 {
        Validator::Union(validators)
    } else {
        validators
            .into_iter()
            .next()
            .expect("combine requires at least one validator")
    };

    if required {
        union
    } else {
        union.nullish()
    }
}

/// Builds an array validator over an already-compiled item validator.
///
/// The length constraints apply to the array itself; the item validator runs against every
/// element, reporting issues under the element's index.
pub fn compile_array(options: &ValidateOptions, items: Validator) -> Validator {
    let mut validator = Validator::array(items);

    if let Some(non_empty) = &options.non_empty {
        if non_empty.value {
            validator = validator.pipe(Action::NonEmpty(non_empty.message.clone()));
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

    refine(validator, Some(options))
}

/// Compiles declarative validation options into an executable [Validator].
///
/// Absent options compile to a pass-through. Options using only the type-agnostic base keys
/// (`schema`, `refine`, `check`) compile to a refined pass-through without a primitive shape.
/// Everything else dispatches over the type creators by key set: every matching creator produces
/// a candidate honoring its applicable constraints, and the candidates [combine] into the final
/// validator. Options matching no creator at all fail compilation with an error naming the
/// offending keys.
pub fn compile(options: Option<&ValidateOptions>, required: bool) -> Result<Validator> {
    let options = match options {
        Some(options) => options,
        None => return Ok(Validator::Unknown),
    };

    if is_base_options(options) {
        return Ok(combine(
            vec![refine(Validator::Unknown, Some(options))],
            required,
        ));
    }

    let mut candidates: Vec<Validator> = VALIDATION_CREATORS
        .iter()
        .filter_map(|create| create(options))
        .collect();

    if is_array_options(options) {
        let items = match &options.items {
            Some(items) => compile(Some(items), false)?,
            None => Validator::Unknown,
        };
        candidates.push(compile_array(options, items));
    }

    if candidates.is_empty() {
        return Err(Error::new(
            format!(
                "No type validator can implement every constraint in ({})",
                print_keys(&options.present_keys())
            ),
            Some(ErrorType::Schema),
        ));
    }

    Ok(combine(candidates, required))
}
