use super::cache::FieldValidatorCache;
use crate::compile::{combine, compile, compile_array, is_array_options, refine};
use crate::error::{Error, ErrorType, Result};
use crate::options::ValidateOptions;
use crate::schema::{FieldConfig, InputField, ResolveInfo, Resolver, TypeRef, TypeRegistry};
use crate::validator::{Entries, IssueList, Validator};
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;

/// What a validation-error callback turns a failure into: a user-facing message, or a
/// ready-made error raised as-is.
pub enum ErrorOrMessage {
    Message(String),
    Error(Error),
}

/// The callback mapping a validation failure to a user-facing error.
///
/// It receives the raw issue list, the raw argument values the client sent, the request context,
/// and the resolution metadata of the failing field.
pub type ValidationErrorFn<Ctx> =
    Arc<dyn Fn(&IssueList, &Value, &Ctx, &ResolveInfo) -> ErrorOrMessage + Send + Sync>;

/// Configuration of one [ValidationPlugin] instance.
pub struct ValidationPluginOptions<Ctx> {
    pub validation_error: Option<ValidationErrorFn<Ctx>>,
}

impl<Ctx> Default for ValidationPluginOptions<Ctx> {
    fn default() -> Self {
        ValidationPluginOptions {
            validation_error: None,
        }
    }
}

/// Identifies which kind of input field a hook invocation is about, along with the names needed
/// to qualify build errors, e.g. `Query.simple(email)` for arguments.
pub(crate) enum InputFieldKind<'a> {
    Argument {
        parent_type: &'a str,
        parent_field: &'a str,
    },
    InputObjectField {
        parent_type: &'a str,
    },
}

/// The validation plugin: compiles declared options into validators as fields are processed and
/// wraps resolvers so the compiled validators run before them.
///
/// One plugin instance belongs to one builder and therefore to one build; its
/// [FieldValidatorCache] is written during that build only and read afterwards by the lazy
/// validators referencing it.
pub struct ValidationPlugin<Ctx> {
    options: ValidationPluginOptions<Ctx>,
    cache: Arc<FieldValidatorCache>,
}

impl<Ctx: Send + Sync + 'static> ValidationPlugin<Ctx> {
    pub fn new(options: ValidationPluginOptions<Ctx>) -> Self {
        ValidationPlugin {
            options,
            cache: Arc::new(FieldValidatorCache::new()),
        }
    }

    /// Hook fired for every input field and argument declaration.
    ///
    /// Fields with neither validation options nor an input-object type are skipped entirely. An
    /// input-object-typed field always gets a validator, even with no direct constraints, so
    /// that the nested type's per-field validators compose through it.
    ///
    /// Argument validators are returned to the caller to be attached to argument metadata;
    /// input-object field validators are inserted into the cache under the parent type.
    pub(crate) fn on_input_field(
        &self,
        kind: InputFieldKind<'_>,
        field: &InputField,
        registry: &TypeRegistry,
    ) -> Result<Option<Validator>> {
        let is_input_object = registry.is_input_object(field.of_type.name());
        if field.validate.is_none() && !is_input_object {
            return Ok(None);
        }

        let field_name = match &kind {
            InputFieldKind::Argument {
                parent_type,
                parent_field,
            } => format!("{parent_type}.{parent_field}({})", field.name),
            InputFieldKind::InputObjectField { parent_type } => {
                format!("{parent_type}.{}", field.name)
            }
        };

        let validator =
            self.create_validator(field.validate.as_ref(), &field.of_type, registry, &field_name)?;

        match kind {
            InputFieldKind::Argument { .. } => Ok(Some(validator)),
            InputFieldKind::InputObjectField { parent_type } => {
                self.cache.insert(parent_type, &field.name, validator);
                Ok(None)
            }
        }
    }

    /// Recursively builds the validator of one declared field type.
    fn create_validator(
        &self,
        options: Option<&ValidateOptions>,
        of_type: &TypeRef,
        registry: &TypeRegistry,
        field_name: &str,
    ) -> Result<Validator> {
        let required = of_type.required();

        match of_type.unwrap_non_null() {
            TypeRef::Named(name) if registry.is_input_object(name) => {
                let cache = self.cache.clone();
                let target = name.clone();
                // The entries lookup is deferred to execution time so the target type's fields
                // don't have to be processed yet — they may include this very field.
                let lazy = Validator::lazy(move || Validator::entries(cache.entries(&target)));

                let mut field_validator = refine(lazy, options);
                if let Some(type_options) = registry.input_object_validate(name) {
                    field_validator = refine(field_validator, Some(type_options));
                }
                Ok(combine(vec![field_validator], required))
            }
            TypeRef::List(of_type) => {
                if let Some(options) = options {
                    if !is_array_options(options) {
                        return Err(Error::new(
                            format!("Expected valid array validator for {field_name}"),
                            Some(ErrorType::Schema),
                        ));
                    }
                }

                let items = self.create_validator(
                    options.and_then(|options| options.items.as_deref()),
                    of_type,
                    registry,
                    field_name,
                )?;

                match options {
                    Some(options) => Ok(combine(vec![compile_array(options, items)], required)),
                    None => Ok(combine(vec![Validator::array(items)], required)),
                }
            }
            _ => match options {
                None => Ok(Validator::Unknown),
                Some(options) => compile(Some(options), required),
            },
        }
    }

    /// Hook wrapping a field's resolver.
    ///
    /// Fields where no argument carries a validator and no field-level options exist get their
    /// resolver back unmodified. Everything else resolves through one object-level validator
    /// over the raw arguments: on success the inner resolver receives the validated, coerced
    /// argument object; on failure the configured validation-error callback (if any) decides
    /// what is raised.
    pub(crate) fn wrap_resolve(
        &self,
        field: FieldConfig<Ctx>,
        argument_validators: Vec<(String, Option<Validator>)>,
    ) -> Resolver<Ctx> {
        let has_validators = argument_validators
            .iter()
            .any(|(_, validator)| validator.is_some());
        if !has_validators && field.validate.is_none() {
            return field.resolver;
        }

        let entries: Entries = argument_validators
            .into_iter()
            .filter_map(|(name, validator)| validator.map(|validator| (name, validator)))
            .collect();

        let mut validator = Validator::entries(entries);
        if let Some(options) = &field.validate {
            validator = refine(validator, Some(options));
        }

        let validator = Arc::new(validator);
        let inner = field.resolver;
        let validation_error = self.options.validation_error.clone();

        Arc::new(move |args: Value, ctx: Arc<Ctx>, info: ResolveInfo| {
            let validator = validator.clone();
            let inner = inner.clone();
            let validation_error = validation_error.clone();
            async move {
                match validator.parse(&args).await {
                    Ok(parsed) => inner(parsed, ctx, info).await,
                    Err(issues) => match &validation_error {
                        Some(map) => match map(&issues, &args, &ctx, &info) {
                            ErrorOrMessage::Message(message) => {
                                Err(Error::new(message, Some(ErrorType::Validation)))
                            }
                            ErrorOrMessage::Error(error) => Err(error),
                        },
                        None => Err(issues.to_error()),
                    },
                }
            }
            .boxed()
        })
    }
}
