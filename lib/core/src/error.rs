use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing configuration value: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Error fetching schema from URL: {0}")]
    Fetch(String),

    #[error("The URL does not contain valid JSON: {0}")]
    MalformedResponse(String),

    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid data shape: {0}")]
    InvalidShape(String),

    #[error("No data to insert")]
    EmptyData,

    #[error("Invalid source schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid validator structure: {0}")]
    InvalidValidator(String),

    #[error("Store command failed: {0}")]
    StoreCommand(String),

    #[error("Insertion failed: {0}")]
    Insertion(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
