//! Error types for the Flutter project generator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    #[error("Handler error for {widget_type} (widget {widget}): {message}")]
    Handler { widget_type: String, widget: u64, message: String },

    #[error("Code generation error: {message}")]
    CodeGen { message: String },

    #[error("Maximum limit exceeded: {limit_type} (limit: {limit})")]
    LimitExceeded { limit_type: String, limit: usize },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

impl GeneratorError {
    pub fn json(file: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            file: file.into(),
            source,
        }
    }

    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    pub fn handler(widget_type: impl Into<String>, widget: u64, message: impl Into<String>) -> Self {
        Self::Handler {
            widget_type: widget_type.into(),
            widget,
            message: message.into(),
        }
    }

    pub fn codegen(message: impl Into<String>) -> Self {
        Self::CodeGen {
            message: message.into(),
        }
    }

    /// Whether a failed write is worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::PermissionDenied
                    | std::io::ErrorKind::Other
            ),
            _ => false,
        }
    }
}
