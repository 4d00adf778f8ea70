//! sqldash – typed parameters for hand-written SQL.
//!
//! An operator writes SQL with named, typed placeholders and the crate turns
//! submitted form values into something safe to execute:
//!
//! ```text
//! select * from orders
//! where active = %(active)b
//!   and customer = %(customer:acme)s
//!   and total > %(minimum)0.2d
//! limit %(limit:50)d
//! ```
//!
//! * `s` is a string, `b` a boolean, `d` a decimal number; `0.2d` (or `.2d`)
//!   fixes two decimals.
//! * `:acme` after the name is a default value.
//!
//! ## Pipeline
//! 1. [`placeholder`] tokenizes the SQL and extracts every placeholder.
//! 2. [`param_set::ParameterSet`] builds one [`parameter::TypedParameter`]
//!    per name and rejects names reused with another type or precision.
//! 3. [`param_set::ParameterSet::bind`] sanitizes submitted values per type.
//! 4. [`rewrite`] produces the final SQL: booleans and numbers become
//!    literals, strings stay `%(name)s` and travel in a binding map for the
//!    driver to escape.
//! 5. An [`execute::Executor`] runs the result; [`execute::SqliteExecutor`]
//!    does so with rusqlite.
//!
//! [`form`] describes and renders an HTML input control per parameter, and
//! [`server`] exposes both halves over HTTP.
//!
//! ## Quick Start
//! ```
//! use std::collections::HashMap;
//! use sqldash::param_set::ParameterSet;
//! let sql = "select * from t where active = %(flag)b and name = %(name:x)s limit %(n)d";
//! let mut parameters = ParameterSet::from_sql(sql).unwrap();
//! let submitted = HashMap::from([
//!     ("flag".to_string(), "TRUE".to_string()),
//!     ("name".to_string(), "orders".to_string()),
//!     ("n".to_string(), "10".to_string()),
//! ]);
//! parameters.bind(&submitted).unwrap();
//! let rewritten = parameters.rewrite(sql).unwrap();
//! assert_eq!(rewritten.sql, "select * from t where active = true and name = %(name)s limit 10");
//! assert_eq!(rewritten.string_bindings["name"].as_deref(), Some("orders"));
//! ```
//!
//! Nothing is shared between requests: every resolution builds its own
//! parameter set and drops it afterwards.

pub mod error;
pub mod execute;
pub mod form;
pub mod logging;
pub mod param_set;
pub mod parameter;
pub mod placeholder;
pub mod rewrite;
pub mod server;
pub mod settings;

pub use error::{ParamError, Result, SqldashError};
pub use param_set::ParameterSet;
pub use parameter::{ParamType, Parameter, TypedParameter};
pub use rewrite::RewrittenQuery;
