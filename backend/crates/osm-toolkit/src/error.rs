//! Error types for osm-toolkit

use thiserror::Error;

/// Result type for osm-toolkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while extracting tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Object type name outside the catalogue
    #[error("Unknown object type: {0}")]
    UnknownObjectType(String),

    /// Vertex list that does not describe a polygon
    #[error("Invalid geometry for {class} '{object}': {reason}")]
    InvalidGeometry {
        class: String,
        object: String,
        reason: String,
    },
}
