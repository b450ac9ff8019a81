//! Data Transfer Objects for the HTTP API.

use osm_toolkit::ObjectType;
use serde::{Deserialize, Serialize};

pub use crate::services::ParseResponse;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Crate version
    pub version: String,
    /// Object types this instance accepts
    pub object_types: Vec<ObjectType>,
}

/// Allow-list and default selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTypesResponse {
    pub allowed: Vec<ObjectType>,
    pub default: Vec<ObjectType>,
}
