//! Error types for osm-model

use thiserror::Error;

/// Result type for osm-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a model
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not valid UTF-8 text
    #[error("Model file is not valid UTF-8 text (byte offset {offset})")]
    Encoding { offset: usize },

    /// The content contains no objects at all
    #[error("Model file contains no objects")]
    EmptyModel,

    /// Structural problem in the object text
    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Object class outside the OpenStudio namespace
    #[error("Unrecognized object class '{class}' on line {line}")]
    UnknownClass { class: String, line: usize },

    /// Object without a `{uuid}` handle in its first field
    #[error("Object '{class}' on line {line} has no handle")]
    MissingHandle { class: String, line: usize },

    /// Two objects share a handle
    #[error("Duplicate handle {handle} on line {line}")]
    DuplicateHandle { handle: String, line: usize },

    /// No `OS:Version` object, so this is not an OpenStudio model
    #[error("Model file has no OS:Version object")]
    MissingVersion,
}
