use std::path::PathBuf;
use thiserror::Error;

/// Failures of the extraction pipeline.
///
/// Missing patterns inside a file are not errors; extractors return empty
/// values for those. These variants cover I/O and files the parser rejects.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("source library not found at {}", path.display())]
    LibraryNotFound { path: PathBuf },

    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ExtractError::NotFound { path }
        } else {
            ExtractError::Io { path, source }
        }
    }
}

/// User-visible failures of the query layer. These become error results, never panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    MissingArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        ToolError::NotFound {
            kind,
            name: name.into(),
        }
    }
}
