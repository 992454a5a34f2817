//! `graphql_validate`
//! =========
//!
//! _Declarative, composable input validation for GraphQL fields and arguments._
//!
//! The **`graphql_validate`** library follows two goals:
//!
//! - To support a pleasant-to-use, declarative API for constraining GraphQL input values
//! - To keep request-time validation cheap and entirely out of the way of unvalidated fields
//!
//! Validation is declared as plain configuration next to a field or argument — bounds, lengths,
//! formats, custom checks — without repeating the value's type. At schema build time each
//! configuration is compiled into an executable validator: the configuration's shape picks the
//! matching type dispatchers, nested object and array configurations recurse, and ambiguous
//! configurations compile to a union of every candidate. At request time a field's argument
//! validators run together as one object-level validator before the resolver is invoked, so a
//! rejected request reports every violated constraint at once, each qualified with the dotted
//! path of the offending value, while the resolver only ever sees validated (and possibly
//! coerced) arguments.
//!
//! Input object types validate through a per-type cache of field validators that's resolved
//! lazily, which makes recursive and mutually referential input types work without any special
//! declaration order.
//!
//! [A good place to start learning more about this crate is the `options` module...](options)

pub mod compile;
pub mod error;
pub mod options;
pub mod plugin;
pub mod schema;
pub mod validator;
