//! Error types for Insight Core
//!
//! Provides error handling for:
//! - Request-level failures returned to the client
//! - Engine and memory-curator failures
//! - JSON and report persistence

use std::path::PathBuf;

/// Terminal category of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credential missing or wrong
    Unauthorized,
    /// Client supplied an unusable brief
    BadRequest,
    /// Anything the client cannot fix
    InternalError,
}

/// Request-level analysis error
///
/// The `Display` text is the detail message returned to the client.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Credential missing or mismatched while a key is configured
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,

    /// Required brief keys absent after normalization
    #[error("Missing required brief fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Engine rejected the brief or could not find a data source
    #[error("{0}")]
    BadInput(String),

    /// Unclassified engine failure or persistence failure
    #[error("{0}")]
    Internal(String),
}

impl AnalysisError {
    /// Classify into a terminal category
    #[inline]
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized => ErrorCategory::Unauthorized,
            Self::MissingFields(_) | Self::BadInput(_) => ErrorCategory::BadRequest,
            Self::Internal(_) => ErrorCategory::InternalError,
        }
    }

    /// Map a memory-curator failure
    #[must_use]
    pub fn memory_update(error: &EngineError) -> Self {
        Self::Internal(format!("Memory update failed: {error}"))
    }
}

impl From<EngineError> for AnalysisError {
    fn from(error: EngineError) -> Self {
        if error.is_client_error() {
            Self::BadInput(error.message().to_string())
        } else {
            Self::Internal(format!("Unexpected analysis error: {}", error.message()))
        }
    }
}

impl From<StoreError> for AnalysisError {
    fn from(error: StoreError) -> Self {
        Self::Internal(error.to_string())
    }
}

/// Failure reported by an analysis engine or memory curator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Brief is malformed for this engine
    #[error("{0}")]
    InvalidBrief(String),

    /// A referenced data source does not exist
    #[error("{0}")]
    SourceNotFound(String),

    /// Any other failure
    #[error("{0}")]
    Failed(String),
}

impl EngineError {
    /// Whether the client caused the failure
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidBrief(_) | Self::SourceNotFound(_))
    }

    /// Message as reported by the engine
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidBrief(msg) | Self::SourceNotFound(msg) | Self::Failed(msg) => msg,
        }
    }
}

/// JSON / report persistence errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File holds JSON that is not an object
    #[error("expected a JSON object in {path}")]
    NotAnObject { path: PathBuf },

    /// Value could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
