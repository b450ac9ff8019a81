//! The parse pipeline: save upload, load model, extract tables, assemble JSON.

use std::path::Path;
use std::sync::Arc;

use osm_toolkit::ObjectType;
use serde_json::{Map, Value};
use tracing::{debug, info, warn, Span};

use super::assembly::{extraction_error, table_to_records};
use super::error::{ParseError, ParseResult};
use crate::config::{FailurePolicy, UploadSettings};
use crate::engine::ModelEngine;
use crate::upload::ScopedUpload;

/// Object-type name → array of records (or an embedded error object).
pub type ParseResponse = Map<String, Value>;

/// A validated upload ready for parsing.
#[derive(Debug, Clone)]
pub struct ParseRequest {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub object_types: Vec<ObjectType>,
}

/// Run the whole pipeline on the current thread.
///
/// The temporary copy of the upload is removed before this returns, whatever
/// the outcome.
pub fn parse_model_file(
    engine: &dyn ModelEngine,
    uploads: &UploadSettings,
    policy: FailurePolicy,
    request: &ParseRequest,
) -> ParseResult<ParseResponse> {
    if request.bytes.is_empty() {
        return Err(ParseError::EmptyFile);
    }

    let upload = ScopedUpload::create(uploads, &request.filename, &request.bytes)
        .map_err(ParseError::Storage)?;
    let result = load_and_extract(engine, upload.path(), policy, &request.object_types);
    upload.close();
    result
}

/// Run [`parse_model_file`] on the blocking pool.
pub async fn parse_upload(
    engine: Arc<dyn ModelEngine>,
    uploads: UploadSettings,
    policy: FailurePolicy,
    request: ParseRequest,
) -> ParseResult<ParseResponse> {
    let span = Span::current();
    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        parse_model_file(engine.as_ref(), &uploads, policy, &request)
    })
    .await
    .map_err(|e| ParseError::Task(e.to_string()))?
}

fn load_and_extract(
    engine: &dyn ModelEngine,
    path: &Path,
    policy: FailurePolicy,
    object_types: &[ObjectType],
) -> ParseResult<ParseResponse> {
    let model = engine.load(path).map_err(ParseError::ModelLoad)?;
    info!(
        objects = model.len(),
        version = model.version().unwrap_or("unknown"),
        "model loaded"
    );

    let mut response = Map::new();
    for &object_type in object_types {
        match engine.extract(&model, object_type) {
            Ok(table) => {
                debug!(%object_type, rows = table.len(), "extracted");
                response.insert(object_type.to_string(), table_to_records(&table));
            }
            Err(source) => match policy {
                FailurePolicy::Embed => {
                    warn!(%object_type, error = %source, "extraction failed");
                    response.insert(
                        object_type.to_string(),
                        extraction_error(object_type, &source),
                    );
                }
                FailurePolicy::Abort => {
                    return Err(ParseError::Extraction {
                        object_type,
                        source,
                    })
                }
            },
        }
    }
    Ok(response)
}
