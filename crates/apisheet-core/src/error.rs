use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error(
        "Neither drf-spectacular nor drf-yasg is installed. Please install one to generate the schema."
    )]
    MissingBackend,

    #[error("failed to run {backend}: {source}")]
    Spawn {
        backend: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{backend} exited with {status}: {stderr}")]
    CommandFailed {
        backend: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{backend} produced an invalid schema: {source}")]
    InvalidSchema {
        backend: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("malformed schema: {0}")]
    MalformedSchema(String),

    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("too many rows for a single worksheet: {0}")]
    TooManyRows(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
