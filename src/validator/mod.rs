//! # Executable validators
//!
//! This module contains the executable validator values the rest of the crate composes and runs.
//! A [Validator] is an immutable tree of combinators — primitive shapes, constraint pipes, arrays,
//! object entries, intersections, unions, null bypasses, and lazy indirections — whose
//! [`parse`](Validator::parse) executes asynchronously against a [`serde_json::Value`] and either
//! returns the validated (and possibly coerced) value or an [IssueList] enumerating every violated
//! constraint with its dotted [Path].
//!
//! Validators are built by the [compile](crate::compile) module out of declarative
//! [options](crate::options), but they're ordinary values and can just as well be composed by
//! hand:
//!
//! ```
//! use graphql_validate::validator::*;
//! use serde_json::json;
//!
//! let validator = Validator::Primitive(Primitive::String).pipe(Action::MaxLength(3, None));
//!
//! let accepted = futures::executor::block_on(validator.parse(&json!("abc")));
//! assert!(accepted.is_ok());
//!
//! let rejected = futures::executor::block_on(validator.parse(&json!("abcdef")));
//! assert!(rejected.is_err());
//! ```
//!
//! Parsing is always asynchronous, even when every constituent check is synchronous, so that
//! deferred predicate checks compose with everything else uniformly.

#[allow(clippy::module_inception)]
mod validator;

mod issue;

pub use issue::{Issue, IssueList, Path, PathSegment};
pub use validator::*;
