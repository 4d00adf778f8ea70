use thiserror::Error;

/// Failures raised while extracting, merging or sanitizing query parameters.
///
/// Every variant aborts the whole resolution request: a query is never run
/// with a parameter that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Invalid placeholder '{placeholder}' at byte {offset}")]
    InvalidPlaceholder { placeholder: String, offset: usize },
    #[error("Invalid type '{found}' for parameter '{name}': previously registered with type '{previous}'")]
    InconsistentType { name: String, found: &'static str, previous: &'static str },
    #[error("Invalid decimals specification '{found}' for parameter '{name}': previously registered with {previous} decimals")]
    InconsistentPrecision { name: String, found: u32, previous: u32 },
    #[error("Invalid default value '{found}' for parameter '{name}': previously registered with default '{previous}'")]
    InconsistentDefault { name: String, found: String, previous: String },
    #[error("Invalid {}value for bool parameter '{name}': '{value}'", default_prefix(.for_default))]
    InvalidBooleanValue { name: String, value: String, for_default: bool },
    #[error("Invalid {}value for number parameter '{name}': '{value}'", default_prefix(.for_default))]
    InvalidNumberValue { name: String, value: String, for_default: bool },
}

fn default_prefix(for_default: &bool) -> &'static str {
    if *for_default { "default " } else { "" }
}

#[derive(Error, Debug)]
pub enum SqldashError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Execution error: {0}")]
    Execution(String),
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParamError),
    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, SqldashError>;

// Helper conversions
impl From<rusqlite::Error> for SqldashError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}

impl From<config::ConfigError> for SqldashError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl From<std::io::Error> for SqldashError {
    fn from(e: std::io::Error) -> Self { Self::Server(e.to_string()) }
}
