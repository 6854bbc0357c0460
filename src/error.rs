use thiserror::Error;

/// Error type for panel construction, configuration and the cleaning run
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Panel contains no entities")]
    EmptyPanel,

    #[error("Length mismatch for entity {entity}: expected {expected} values, got {actual}")]
    LengthMismatch {
        entity: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate entity key: {0}")]
    DuplicateEntity(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[source] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[source] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigParse(format!("YAML: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(format!("TOML: {}", err))
    }
}

impl Error {
    /// True for errors that abort a run before any entity is processed
    pub fn is_fatal_run_error(&self) -> bool {
        matches!(self, Error::InvalidConfiguration(_) | Error::EmptyPanel)
    }
}
