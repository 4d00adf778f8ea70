//! Running rewritten queries.
//!
//! The parameter engine ends at a [`RewrittenQuery`]; whatever executes it
//! implements [`Executor`]. [`SqliteExecutor`] is the one shipped here.

use std::collections::HashMap;

use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, SqldashError};
use crate::param_set::ParameterSet;
use crate::placeholder::{self, Segment};
use crate::rewrite::RewrittenQuery;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
    /// More rows were available than the row limit allowed.
    pub truncated: bool,
}

pub trait Executor {
    fn execute(&self, query: &RewrittenQuery) -> Result<QueryResult>;
}

/// Extracts, binds and rewrites `sql`; no database is touched.
pub fn resolve(sql: &str, submitted: &HashMap<String, String>) -> Result<(ParameterSet, RewrittenQuery)> {
    let mut parameters = ParameterSet::from_sql(sql)?;
    parameters.bind(submitted)?;
    let rewritten = parameters.rewrite(sql)?;
    Ok((parameters, rewritten))
}

/// The whole pipeline: resolve the parameters of `sql`, then execute.
pub fn resolve_and_execute(
    executor: &impl Executor,
    sql: &str,
    submitted: &HashMap<String, String>,
) -> Result<QueryResult> {
    let (parameters, rewritten) = resolve(sql, submitted)?;
    debug!(parameters = parameters.len(), sql = %rewritten.sql, "executing resolved query");
    executor.execute(&rewritten)
}

// ------------- SQLite -------------
pub struct SqliteExecutor {
    connection: Connection,
    row_limit: usize,
}

impl SqliteExecutor {
    pub fn new(connection: Connection, row_limit: usize) -> Self {
        Self { connection, row_limit }
    }
    pub fn open(path: &str, row_limit: usize, read_only: bool) -> Result<Self> {
        let connection = if read_only {
            Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI)?
        } else {
            Connection::open(path)?
        };
        Ok(Self::new(connection, row_limit))
    }
    pub fn in_memory(row_limit: usize) -> Result<Self> {
        Ok(Self::new(Connection::open_in_memory()?, row_limit))
    }
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

/// Translates the driver-neutral form into SQLite's: every `%(name)s` left
/// for native binding becomes a generated `:pN` (names may contain `-`,
/// which SQLite does not accept) and `%%` becomes `%`.
fn to_sqlite(query: &RewrittenQuery) -> Result<(String, Vec<(String, Option<String>)>)> {
    let mut sql = String::with_capacity(query.sql.len());
    let mut assigned: HashMap<String, String> = HashMap::new();
    let mut bindings = Vec::new();
    for segment in placeholder::tokenize(&query.sql)? {
        match segment {
            Segment::Text(text) => sql.push_str(text),
            Segment::Percent => sql.push('%'),
            Segment::Placeholder(found) => {
                let Some(value) = query.string_bindings.get(&found.name) else {
                    return Err(SqldashError::Execution(format!(
                        "no value bound for placeholder '{}'",
                        &query.sql[found.span]
                    )));
                };
                // `:p1` followed by `1` would read as `:p11`
                if query.sql[found.span.end..].starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$') {
                    return Err(SqldashError::Execution(format!(
                        "placeholder '{}' runs into the text after it",
                        &query.sql[found.span]
                    )));
                }
                let key = match assigned.get(&found.name) {
                    Some(key) => key.clone(),
                    None => {
                        let key = format!(":p{}", assigned.len() + 1);
                        assigned.insert(found.name.clone(), key.clone());
                        bindings.push((key.clone(), value.clone()));
                        key
                    }
                };
                sql.push_str(&key);
            }
        }
    }
    Ok((sql, bindings))
}

// failures of the submitted SQL itself, as opposed to opening the database
fn statement_error(e: rusqlite::Error) -> SqldashError {
    SqldashError::Execution(e.to_string())
}

fn render_cell(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

impl Executor for SqliteExecutor {
    fn execute(&self, query: &RewrittenQuery) -> Result<QueryResult> {
        let (sql, bindings) = to_sqlite(query)?;
        let mut statement = self.connection.prepare(&sql).map_err(statement_error)?;
        let params: Vec<(&str, &dyn ToSql)> = bindings
            .iter()
            .map(|(key, value)| (key.as_str(), value as &dyn ToSql))
            .collect();
        let columns: Vec<String> = statement.column_names().into_iter().map(String::from).collect();
        let mut rows = statement.query(params.as_slice()).map_err(statement_error)?;
        let mut result = QueryResult { columns, ..QueryResult::default() };
        while let Some(row) = rows.next().map_err(statement_error)? {
            if result.rows.len() == self.row_limit {
                result.truncated = true;
                break;
            }
            let mut cells = Vec::with_capacity(result.columns.len());
            for i in 0..result.columns.len() {
                cells.push(render_cell(row.get_ref(i).map_err(statement_error)?));
            }
            result.rows.push(cells);
        }
        result.row_count = result.rows.len();
        info!(rows = result.row_count, truncated = result.truncated, "query complete");
        Ok(result)
    }
}
