//! OpenAPI description served at `GET /docs`.

use serde_json::{json, Value};

use crate::selection::{ObjectTypePolicy, OBJECT_TYPES_PARAM};

/// Build the OpenAPI 3 document for this instance's allow-list.
pub fn openapi_document(policy: &ObjectTypePolicy) -> Value {
    let allowed: Vec<&str> = policy.allowed().iter().map(|t| t.as_str()).collect();
    let defaults: Vec<&str> = policy.defaults().iter().map(|t| t.as_str()).collect();
    let error_response = json!({
        "description": "Error",
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/ApiError" } }
        }
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "OpenStudio OSM Parser API",
            "description": "Parse OpenStudio (OSM) files and extract building model information.",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/parse": {
                "post": {
                    "summary": "Parse OSM File",
                    "parameters": [{
                        "name": OBJECT_TYPES_PARAM,
                        "in": "query",
                        "required": false,
                        "description": format!(
                            "Object types to extract. Repeat the parameter or separate with \
                             commas. Defaults to: {}",
                            defaults.join(", ")
                        ),
                        "style": "form",
                        "explode": true,
                        "schema": {
                            "type": "array",
                            "items": { "type": "string", "enum": allowed }
                        }
                    }],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "required": ["file"],
                                    "properties": {
                                        "file": {
                                            "type": "string",
                                            "format": "binary",
                                            "description": "OpenStudio Model (OSM) file to parse."
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Records per object type",
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "additionalProperties": {
                                    "oneOf": [
                                        { "type": "array", "items": { "type": "object" } },
                                        {
                                            "type": "object",
                                            "properties": { "error": { "type": "string" } }
                                        }
                                    ]
                                }
                            } } }
                        },
                        "400": error_response.clone(),
                        "413": error_response.clone(),
                        "500": error_response,
                    }
                }
            },
            "/object-types": {
                "get": {
                    "summary": "Allowed and default object types",
                    "responses": { "200": { "description": "Object type lists" } }
                }
            },
            "/health": {
                "get": {
                    "summary": "Health check",
                    "responses": { "200": { "description": "Service is up" } }
                }
            }
        },
        "components": {
            "schemas": {
                "ApiError": {
                    "type": "object",
                    "required": ["code", "message"],
                    "properties": {
                        "code": { "type": "string" },
                        "message": { "type": "string" },
                        "details": { "type": "string" }
                    }
                }
            }
        }
    })
}
