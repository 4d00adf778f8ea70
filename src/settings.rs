//! Runtime settings.
//!
//! Read from built-in defaults, then an optional `sqldash.toml` (or any
//! format the `config` crate recognizes by extension), then `SQLDASH_*`
//! environment variables, later sources overriding earlier ones.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub bind_address: String,
    /// SQLite database the queries run against.
    pub database: String,
    pub read_only: bool,
    /// Rows returned per query at most.
    pub row_limit: usize,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from("sqldash")
    }

    /// `file` is looked up without requiring an extension and may be missing.
    pub fn load_from(file: &str) -> Result<Self> {
        let config = Config::builder()
            .set_default("bind_address", "127.0.0.1:8080")?
            .set_default("database", ":memory:")?
            .set_default("read_only", false)?
            .set_default("row_limit", 1000)?
            .set_default("log_filter", "info")?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("SQLDASH"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
