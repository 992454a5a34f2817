use super::execute::{ExecutableSchema, WrappedField};
use super::schema::{FieldConfig, InputObjectType, ResolveInfo};
use crate::error::Result;
use crate::options::ValidateOptions;
use crate::plugin::{InputFieldKind, ValidationPlugin, ValidationPluginOptions};
use hashbrown::HashMap;

/// The kinds a named type can resolve to during a build.
pub(crate) enum NamedKind {
    InputObject { validate: Option<ValidateOptions> },
    Scalar,
    Enum,
}

/// Resolves type names referenced by [`TypeRef`](super::TypeRef)s to their declarations.
///
/// The registry exists for the duration of one build. The built-in scalars are always known;
/// everything else is registered from the builder's declarations before any field is processed,
/// so forward references among input types resolve no matter the declaration order.
pub(crate) struct TypeRegistry {
    types: HashMap<String, NamedKind>,
}

impl TypeRegistry {
    fn new() -> Self {
        let mut types = HashMap::new();
        for builtin in ["Int", "Float", "String", "Boolean", "ID"] {
            types.insert(builtin.to_string(), NamedKind::Scalar);
        }
        TypeRegistry { types }
    }

    fn insert(&mut self, name: String, kind: NamedKind) {
        self.types.insert(name, kind);
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub(crate) fn is_input_object(&self, name: &str) -> bool {
        matches!(self.types.get(name), Some(NamedKind::InputObject { .. }))
    }

    pub(crate) fn input_object_validate(&self, name: &str) -> Option<&ValidateOptions> {
        match self.types.get(name) {
            Some(NamedKind::InputObject { validate }) => validate.as_ref(),
            _ => None,
        }
    }
}

/// The lifecycle states one build moves through, in order.
///
/// Transitions are driven by [`SchemaBuilder::build`] alone; a builder is consumed by its build,
/// so no second build can observe intermediate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BuildState {
    Idle,
    FieldsProcessed,
    ResolversWrapped,
    Built,
}

/// Declares types and fields, then builds them into an [ExecutableSchema].
///
/// The builder owns a [ValidationPlugin] instance and drives its two hooks while building: every
/// input-object field and every argument is offered to the plugin first (compiling and caching
/// validators), and every resolver is passed through the plugin's wrapping step afterwards.
pub struct SchemaBuilder<Ctx = ()> {
    input_objects: Vec<InputObjectType>,
    enums: Vec<String>,
    scalars: Vec<String>,
    fields: Vec<FieldConfig<Ctx>>,
    plugin: ValidationPlugin<Ctx>,
    state: BuildState,
}

impl<Ctx: Send + Sync + 'static> SchemaBuilder<Ctx> {
    /// Create a builder with default plugin options.
    pub fn new() -> Self {
        Self::with_options(ValidationPluginOptions::default())
    }

    /// Create a builder with the given plugin options.
    pub fn with_options(options: ValidationPluginOptions<Ctx>) -> Self {
        SchemaBuilder {
            input_objects: Vec::new(),
            enums: Vec::new(),
            scalars: Vec::new(),
            fields: Vec::new(),
            plugin: ValidationPlugin::new(options),
            state: BuildState::Idle,
        }
    }

    /// Declare an input object type.
    pub fn input_object(mut self, input_object: InputObjectType) -> Self {
        self.input_objects.push(input_object);
        self
    }

    /// Declare an enum type by name.
    pub fn enum_type(mut self, name: impl Into<String>) -> Self {
        self.enums.push(name.into());
        self
    }

    /// Declare a custom scalar type by name.
    pub fn scalar(mut self, name: impl Into<String>) -> Self {
        self.scalars.push(name.into());
        self
    }

    /// Declare a root field.
    pub fn field(mut self, field: FieldConfig<Ctx>) -> Self {
        self.fields.push(field);
        self
    }

    /// Build the declared schema, compiling and attaching every declared validator.
    ///
    /// Building fails with a `Schema` error when any validation options match no type
    /// dispatcher, when list-typed fields carry non-array-shaped options, or when a type ref
    /// names an undeclared type. A failed build yields no partial schema.
    pub fn build(mut self) -> Result<ExecutableSchema<Ctx>> {
        debug_assert_eq!(self.state, BuildState::Idle);

        let mut registry = TypeRegistry::new();
        for name in self.enums.drain(..) {
            registry.insert(name, NamedKind::Enum);
        }
        for name in self.scalars.drain(..) {
            registry.insert(name, NamedKind::Scalar);
        }
        for input_object in &self.input_objects {
            registry.insert(
                input_object.name.clone(),
                NamedKind::InputObject {
                    validate: input_object.validate.clone(),
                },
            );
        }

        for input_object in &self.input_objects {
            for field in &input_object.fields {
                check_reference(&registry, field, &input_object.name)?;
            }
        }
        for field in &self.fields {
            for argument in &field.arguments {
                check_reference(&registry, argument, &field.name)?;
            }
        }

        for input_object in &self.input_objects {
            for field in &input_object.fields {
                self.plugin.on_input_field(
                    InputFieldKind::InputObjectField {
                        parent_type: &input_object.name,
                    },
                    field,
                    &registry,
                )?;
            }
        }

        let fields = std::mem::take(&mut self.fields);
        let mut argument_validators = Vec::with_capacity(fields.len());
        for field in &fields {
            let mut validators = Vec::with_capacity(field.arguments.len());
            for argument in &field.arguments {
                let validator = self.plugin.on_input_field(
                    InputFieldKind::Argument {
                        parent_type: "Query",
                        parent_field: &field.name,
                    },
                    argument,
                    &registry,
                )?;
                validators.push((argument.name.clone(), validator));
            }
            argument_validators.push(validators);
        }
        self.state = BuildState::FieldsProcessed;

        let mut wrapped = HashMap::with_capacity(fields.len());
        for (field, validators) in fields.into_iter().zip(argument_validators) {
            let info = ResolveInfo {
                parent_type: "Query".to_string(),
                field_name: field.name.clone(),
            };
            let name = field.name.clone();
            let resolver = self.plugin.wrap_resolve(field, validators);
            wrapped.insert(name, WrappedField { resolver, info });
        }
        self.state = BuildState::ResolversWrapped;

        let schema = ExecutableSchema { fields: wrapped };
        self.state = BuildState::Built;
        Ok(schema)
    }
}

impl<Ctx: Send + Sync + 'static> Default for SchemaBuilder<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_reference(
    registry: &TypeRegistry,
    field: &super::schema::InputField,
    parent: &str,
) -> Result<()> {
    let name = field.of_type.name();
    if registry.contains(name) {
        Ok(())
    } else {
        Err(crate::error::Error::new(
            format!("Unknown type {name} referenced by {parent}.{}", field.name),
            Some(crate::error::ErrorType::Schema),
        ))
    }
}
