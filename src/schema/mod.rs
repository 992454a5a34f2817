//! # Schema declarations and the build surface
//!
//! This module contains the declaration types the validation plugin integrates with: named
//! [type refs](TypeRef), [input object types](InputObjectType) and their [fields](InputField),
//! root [field configs](FieldConfig) with async resolvers, and the [SchemaBuilder] that turns the
//! declarations into an [ExecutableSchema].
//!
//! The builder is deliberately small — types, fields, arguments, resolvers — because its job here
//! is to drive the plugin's two hooks in lifecycle order: each declared input field and argument
//! is processed (compiling and caching its validator) before any resolver is wrapped. Building is
//! a one-shot, single-threaded pass; the resulting schema is immutable and shared freely.
//!
//! ```
//! use graphql_validate::options::ValidateOptions;
//! use graphql_validate::schema::*;
//! use serde_json::json;
//!
//! let schema = SchemaBuilder::<()>::new()
//!     .field(
//!         FieldConfig::new("hello", resolver(|args, _ctx, _info| async move {
//!             Ok(json!(format!("hello {}", args["name"].as_str().unwrap_or("world"))))
//!         }))
//!         .argument(
//!             InputField::new("name", TypeRef::named("String"))
//!                 .validate(ValidateOptions::new().min_length(1)),
//!         ),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let result = futures::executor::block_on(schema.resolve_field(
//!     "hello",
//!     json!({ "name": "graphql" }),
//!     std::sync::Arc::new(()),
//! ));
//! assert_eq!(result.unwrap(), json!("hello graphql"));
//! ```

#[allow(clippy::module_inception)]
mod schema;

mod builder;
mod execute;

pub(crate) use builder::TypeRegistry;
pub use builder::SchemaBuilder;
pub use execute::{ExecutableSchema, Response, ResponseError, Selection};
pub use schema::*;
