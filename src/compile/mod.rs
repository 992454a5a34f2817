//! # The Validator Compiler
//!
//! This module translates declarative [options](crate::options) into executable
//! [validators](crate::validator). The translation dispatches on the shape of the options rather
//! than on a declared type: each concrete type creator recognizes an exact set of option keys,
//! and an options value is offered to every creator whose key set covers it. One match produces a
//! plain typed validator; several matches produce a union accepting a value that satisfies any
//! candidate; no match fails compilation with an error naming the keys nothing could implement.
//!
//! The creators run in a fixed order — number, bigint, boolean, date, string, object — with
//! arrays handled on a separate path whose `items` sub-options recurse through [compile] itself.
//! Every creator funnels its output through the shared [refine] pipeline, which applies the
//! type-agnostic stages: `schema` intersection, the `refine` hook, and custom checks.
//!
//! [compile] is usable on its own to build one ad-hoc validator outside any schema build:
//!
//! ```
//! use graphql_validate::{compile::compile, options::ValidateOptions};
//! use serde_json::json;
//!
//! let options = ValidateOptions::new().email(true);
//! let validator = compile(Some(&options), true).unwrap();
//!
//! assert!(futures::executor::block_on(validator.parse(&json!("abc@def.com"))).is_ok());
//! assert!(futures::executor::block_on(validator.parse(&json!("abc"))).is_err());
//! ```

#[allow(clippy::module_inception)]
mod compile;

mod creators;

pub use compile::*;
pub use creators::is_array_options;
