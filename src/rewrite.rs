//! Substitution of sanitized values into SQL text.
//!
//! Database drivers only bind named parameters as strings. String parameters
//! therefore stay placeholders and travel next to the SQL in
//! [`RewrittenQuery::string_bindings`], while booleans and numbers are
//! written into the text as literals. That is only sound because a
//! [`TypedParameter`] can hold nothing but a sanitized value: `true`, `false`
//! or a plain decimal literal.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::error::ParamError;
use crate::parameter::{ParamType, TypedParameter};
use crate::placeholder::{self, Segment};

/// SQL ready for a parameterized `execute(sql, bindings)` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewrittenQuery {
    pub sql: String,
    /// Values for the `%(name)s` placeholders left in `sql`; `None` binds NULL.
    pub string_bindings: BTreeMap<String, Option<String>>,
}

/// Rewrites `sql` for the given parameters in one pass over its tokens.
///
/// * string parameter: its value goes to the bindings; its placeholders are
///   reduced to the bare `%(name)s` form when a default hint was written,
///   otherwise left as they are;
/// * boolean or number parameter: every placeholder of that name becomes the
///   value, or `null` when there is none.
///
/// Placeholders naming no parameter, plain text and escaped `%%` are copied
/// verbatim. When a name is listed twice the first entry wins.
pub fn rewrite(sql: &str, parameters: &[TypedParameter]) -> Result<RewrittenQuery, ParamError> {
    let mut by_name: HashMap<&str, &TypedParameter> = HashMap::with_capacity(parameters.len());
    let mut string_bindings = BTreeMap::new();
    for parameter in parameters {
        if by_name.contains_key(parameter.name()) {
            continue;
        }
        by_name.insert(parameter.name(), parameter);
        if parameter.kind() == ParamType::String {
            string_bindings.insert(parameter.name().to_string(), parameter.value().map(str::to_string));
        }
    }

    let mut rewritten = String::with_capacity(sql.len());
    let mut literals = 0usize;
    for segment in placeholder::tokenize(sql)? {
        match segment {
            Segment::Text(text) => rewritten.push_str(text),
            Segment::Percent => rewritten.push_str("%%"),
            Segment::Placeholder(found) => match by_name.get(found.name.as_str()) {
                Some(parameter) if parameter.kind() == ParamType::String => {
                    if parameter.has_nominal_default() {
                        rewritten.push_str(&found.bare());
                    } else {
                        rewritten.push_str(&sql[found.span.clone()]);
                    }
                }
                Some(parameter) => {
                    literals += 1;
                    rewritten.push_str(parameter.value().unwrap_or("null"));
                }
                None => rewritten.push_str(&sql[found.span.clone()]),
            },
        }
    }
    debug!(literals, bindings = string_bindings.len(), "rewrote query");
    Ok(RewrittenQuery { sql: rewritten, string_bindings })
}
