//! # The validation plugin
//!
//! This module wires the [compiler](crate::compile) into the
//! [schema builder](crate::schema::SchemaBuilder) through two hooks. The first fires per
//! input-field declaration — covering both fields of input object types and arguments of output
//! fields — and builds the field's validator: scalars compile directly, list types recurse into
//! their element type, and input-object types get a lazily-resolved validator over the target
//! type's cached field validators, which is what makes self- and mutually-referential input types
//! work. The second hook wraps a field's resolver so that one object-level validator over all of
//! its arguments runs against the raw argument values first; the resolver then sees the
//! validated, coerced arguments, or an error is raised carrying every violated constraint with
//! its dotted path.
//!
//! A [`validation_error`](ValidationPluginOptions::validation_error) callback can translate raw
//! validation failures into user-facing errors per plugin instance.
//!
//! Fields without any validated argument and without field-level options keep their original
//! resolver — unvalidated fields cost nothing at resolution time.

#[allow(clippy::module_inception)]
mod plugin;

mod cache;

#[cfg(test)]
mod tests;

pub use cache::FieldValidatorCache;
pub(crate) use plugin::InputFieldKind;
pub use plugin::{ErrorOrMessage, ValidationErrorFn, ValidationPlugin, ValidationPluginOptions};
