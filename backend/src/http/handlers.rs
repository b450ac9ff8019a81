//! HTTP handlers for the REST API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use super::docs;
use super::dto::{HealthResponse, ObjectTypesResponse, ParseResponse};
use super::error::AppError;
use super::state::AppState;
use crate::selection::requested_object_types;
use crate::services::{parse_upload, ParseError, ParseRequest};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Multipart field carrying the model file.
pub const FILE_FIELD: &str = "file";

const DEFAULT_FILENAME: &str = "model.osm";

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        object_types: state.object_types.allowed().to_vec(),
    })
}

/// GET /object-types
pub async fn list_object_types(State(state): State<AppState>) -> Json<ObjectTypesResponse> {
    Json(ObjectTypesResponse {
        allowed: state.object_types.allowed().to_vec(),
        default: state.object_types.defaults().to_vec(),
    })
}

/// GET /docs
pub async fn api_docs(State(state): State<AppState>) -> Json<Value> {
    Json(docs::openapi_document(&state.object_types))
}

// =============================================================================
// Parse
// =============================================================================

/// POST /parse
///
/// Parse an uploaded model file into one table per requested object type.
/// Object types are validated before the upload is read or saved.
pub async fn parse_model(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> HandlerResult<ParseResponse> {
    let span = info_span!("parse", request_id = %Uuid::new_v4());

    async move {
        let object_types = state.object_types.select(requested_object_types(&query))?;

        let mut multipart = multipart.map_err(|rejection| {
            debug!(%rejection, "request is not multipart");
            ParseError::MissingFile
        })?;
        let (filename, bytes) = read_file_field(&mut multipart).await?;

        let names: Vec<&str> = object_types.iter().map(|t| t.as_str()).collect();
        info!(%filename, bytes = bytes.len(), object_types = ?names, "parsing upload");

        let response = parse_upload(
            state.engine.clone(),
            state.config.uploads.clone(),
            state.config.extraction.failure_policy,
            ParseRequest {
                filename,
                bytes,
                object_types,
            },
        )
        .await?;

        Ok::<_, AppError>(Json(response))
    }
    .instrument(span)
    .await
}

/// Read the `file` field, skipping any other fields.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or(DEFAULT_FILENAME).to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(ParseError::MissingFile.into())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        ParseError::UnreadableFile(err.body_text()).into()
    }
}
