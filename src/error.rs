use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid synonym pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Filter error: {0}")]
    Filter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CanonError>;
