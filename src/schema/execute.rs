use super::schema::{ResolveInfo, Resolver};
use crate::error::{Error, ErrorType, Result};
use hashbrown::HashMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

pub(crate) struct WrappedField<Ctx> {
    pub(crate) resolver: Resolver<Ctx>,
    pub(crate) info: ResolveInfo,
}

/// The built, executable result of a [`SchemaBuilder`](super::SchemaBuilder).
///
/// Every field's resolver has been wrapped (or deliberately left untouched) by the validation
/// plugin; the schema itself is immutable and safely shared across concurrent requests.
pub struct ExecutableSchema<Ctx = ()> {
    pub(crate) fields: HashMap<String, WrappedField<Ctx>>,
}

impl<Ctx: Send + Sync + 'static> ExecutableSchema<Ctx> {
    /// Resolve a single field against raw argument values.
    ///
    /// Arguments are validated before the field's resolver runs; on success the resolver receives
    /// the validated, possibly coerced argument object rather than the raw input.
    pub async fn resolve_field(&self, field_name: &str, args: Value, ctx: Arc<Ctx>) -> Result<Value> {
        let field = self.fields.get(field_name).ok_or_else(|| {
            Error::new(
                format!("Unknown field {field_name}"),
                Some(ErrorType::Validation),
            )
        })?;
        (field.resolver)(args, ctx, field.info.clone()).await
    }

    /// Execute a set of selections, producing a partial response.
    ///
    /// A failing field resolves to null under its response key and appends an error entry, while
    /// sibling selections continue resolving independently.
    pub async fn execute(&self, selections: &[Selection], ctx: Arc<Ctx>) -> Response {
        let mut data = Map::new();
        let mut errors = Vec::new();
        for selection in selections {
            let key = selection
                .alias
                .clone()
                .unwrap_or_else(|| selection.field.clone());
            match self
                .resolve_field(&selection.field, selection.args.clone(), ctx.clone())
                .await
            {
                Ok(value) => {
                    data.insert(key, value);
                }
                Err(error) => {
                    data.insert(key, Value::Null);
                    errors.push(ResponseError {
                        message: error.print(true),
                    });
                }
            }
        }
        Response { data, errors }
    }
}

/// One requested field: which field to resolve, under which response key, with which arguments.
#[derive(Clone, Debug)]
pub struct Selection {
    pub field: String,
    pub alias: Option<String>,
    pub args: Value,
}

impl Selection {
    pub fn new(field: impl Into<String>, args: Value) -> Self {
        Selection {
            field: field.into(),
            alias: None,
            args,
        }
    }

    /// Record the result under a different response key.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// A response following the partial-response model: per-selection data with null entries for
/// failed fields, and one error entry per failure.
#[derive(Clone, Debug, Serialize)]
pub struct Response {
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResponseError>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResponseError {
    pub message: String,
}
