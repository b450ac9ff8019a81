//! Errors of the parse pipeline.

use osm_toolkit::ObjectType;
use thiserror::Error;

use crate::selection::InvalidObjectTypes;

/// Result type for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Ways a parse request can fail.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No multipart field named `file`
    #[error("No file uploaded: expected a multipart field named 'file'")]
    MissingFile,

    /// The file field could not be read from the request
    #[error("Could not read uploaded file: {0}")]
    UnreadableFile(String),

    #[error("Uploaded file is empty.")]
    EmptyFile,

    #[error(transparent)]
    InvalidObjectTypes(#[from] InvalidObjectTypes),

    /// Writing the temporary copy failed
    #[error("Could not save uploaded file: {0}")]
    Storage(#[source] std::io::Error),

    /// The loader rejected the file
    #[error("Failed to load model: {0}")]
    ModelLoad(#[source] osm_model::Error),

    /// An extraction routine failed and the failure policy is `abort`
    #[error("Error processing {object_type}: {source}")]
    Extraction {
        object_type: ObjectType,
        #[source]
        source: osm_toolkit::Error,
    },

    /// The blocking task panicked or was cancelled
    #[error("Parse task failed: {0}")]
    Task(String),
}

impl ParseError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::MissingFile => "MISSING_FILE",
            ParseError::UnreadableFile(_) => "UNREADABLE_FILE",
            ParseError::EmptyFile => "EMPTY_FILE",
            ParseError::InvalidObjectTypes(_) => "INVALID_OBJECT_TYPE",
            ParseError::Storage(_) => "STORAGE_ERROR",
            ParseError::ModelLoad(_) => "MODEL_LOAD_FAILED",
            ParseError::Extraction { .. } => "EXTRACTION_FAILED",
            ParseError::Task(_) => "INTERNAL_ERROR",
        }
    }

    /// `true` for errors caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ParseError::MissingFile
                | ParseError::UnreadableFile(_)
                | ParseError::EmptyFile
                | ParseError::InvalidObjectTypes(_)
                | ParseError::ModelLoad(_)
        )
    }
}
