//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::{ConfigError, ServiceConfig};
use crate::engine::ModelEngine;
use crate::selection::ObjectTypePolicy;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Model loader and extraction toolkit
    pub engine: Arc<dyn ModelEngine>,
    /// Resolved service configuration
    pub config: Arc<ServiceConfig>,
    /// Allow-list and default selection validated from `config`
    pub object_types: Arc<ObjectTypePolicy>,
}

impl AppState {
    /// Create the application state, validating the extraction settings.
    pub fn new(config: ServiceConfig, engine: Arc<dyn ModelEngine>) -> Result<Self, ConfigError> {
        let object_types = config.object_type_policy()?;
        Ok(Self {
            engine,
            config: Arc::new(config),
            object_types: Arc::new(object_types),
        })
    }
}
