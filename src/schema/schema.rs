use crate::error::Result;
use crate::options::ValidateOptions;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;

/// A reference to a declared type, by name, optionally wrapped as a list or non-null.
///
/// Type refs reference named types rather than owning them so that self-referential and mutually
/// recursive input types are expressible; the builder resolves names against its registry while
/// the schema is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Reference a named type.
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wrap this type as a list of it.
    #[inline]
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Mark this type as required.
    #[inline]
    pub fn non_null(self) -> Self {
        TypeRef::NonNull(Box::new(self))
    }

    /// The name of the innermost named type this ref points at.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(of_type) => of_type.name(),
            TypeRef::NonNull(of_type) => of_type.name(),
        }
    }

    pub(crate) fn required(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub(crate) fn unwrap_non_null(&self) -> &TypeRef {
        let mut current = self;
        while let TypeRef::NonNull(inner) = current {
            current = inner;
        }
        current
    }
}

/// An input field declaration: a field of an input object type, or an argument of an output
/// field. Both carry a name, a type ref, and optionally the validation options to compile for
/// the declared value.
#[derive(Clone, Debug)]
pub struct InputField {
    pub name: String,
    pub of_type: TypeRef,
    pub(crate) validate: Option<ValidateOptions>,
}

impl InputField {
    #[inline]
    pub fn new(name: impl Into<String>, of_type: TypeRef) -> Self {
        InputField {
            name: name.into(),
            of_type,
            validate: None,
        }
    }

    /// Attach validation options to this field.
    pub fn validate(mut self, options: ValidateOptions) -> Self {
        self.validate = Some(options);
        self
    }
}

/// An Input Object type declaration.
///
/// Inputs, such as arguments, may sometimes be nested and accept objects that must adhere to the
/// shape of an Input Object definition. Beyond its fields' own options, the type itself may carry
/// object-level validation options, which apply wherever the type is referenced.
#[derive(Clone, Debug)]
pub struct InputObjectType {
    pub name: String,
    pub(crate) validate: Option<ValidateOptions>,
    pub(crate) fields: Vec<InputField>,
}

impl InputObjectType {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        InputObjectType {
            name: name.into(),
            validate: None,
            fields: Vec::new(),
        }
    }

    /// Attach object-level validation options to this type.
    pub fn validate(mut self, options: ValidateOptions) -> Self {
        self.validate = Some(options);
        self
    }

    /// Add a field to this type.
    pub fn field(mut self, field: InputField) -> Self {
        self.fields.push(field);
        self
    }
}

/// The resolution metadata a resolver (and the validation-error callback) receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveInfo {
    pub parent_type: String,
    pub field_name: String,
}

/// A field's resolver: an async function from the (validated) argument object and the request
/// context to the field's value.
pub type Resolver<Ctx> =
    Arc<dyn Fn(Value, Arc<Ctx>, ResolveInfo) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Wraps an async closure into a [Resolver].
pub fn resolver<Ctx, F, Fut>(func: F) -> Resolver<Ctx>
where
    F: Fn(Value, Arc<Ctx>, ResolveInfo) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |args, ctx, info| func(args, ctx, info).boxed())
}

/// An output field declaration: its arguments, optional field-level validation options applying
/// to the whole argument object, and its resolver.
pub struct FieldConfig<Ctx> {
    pub name: String,
    pub(crate) arguments: Vec<InputField>,
    pub(crate) validate: Option<ValidateOptions>,
    pub(crate) resolver: Resolver<Ctx>,
}

impl<Ctx> FieldConfig<Ctx> {
    #[inline]
    pub fn new(name: impl Into<String>, resolver: Resolver<Ctx>) -> Self {
        FieldConfig {
            name: name.into(),
            arguments: Vec::new(),
            validate: None,
            resolver,
        }
    }

    /// Add an argument to this field.
    pub fn argument(mut self, argument: InputField) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Attach validation options spanning the whole argument object.
    ///
    /// Only the type-agnostic stages apply here — `schema`, `refine`, and `check` — which is what
    /// makes cross-argument checks possible.
    pub fn validate(mut self, options: ValidateOptions) -> Self {
        self.validate = Some(options);
        self
    }
}
