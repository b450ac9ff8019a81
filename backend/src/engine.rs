//! Boundary to the model-loading library and the extraction toolkit.

use std::path::Path;

use osm_model::Model;
use osm_toolkit::{ObjectType, Table};

/// Loads models and extracts tables.
///
/// Both calls are synchronous and may be slow; callers run them on the
/// blocking pool.
pub trait ModelEngine: Send + Sync {
    fn load(&self, path: &Path) -> osm_model::Result<Model>;

    fn extract(&self, model: &Model, object_type: ObjectType) -> osm_toolkit::Result<Table>;
}

/// Engine backed by `osm-model` and `osm-toolkit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsmEngine;

impl ModelEngine for OsmEngine {
    fn load(&self, path: &Path) -> osm_model::Result<Model> {
        Model::from_file(path)
    }

    fn extract(&self, model: &Model, object_type: ObjectType) -> osm_toolkit::Result<Table> {
        osm_toolkit::extract(model, object_type)
    }
}
