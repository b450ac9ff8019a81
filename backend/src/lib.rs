//! # OSM Parser API
//!
//! HTTP service that accepts an uploaded OpenStudio Model (`.osm`) file and
//! returns one JSON table per requested object type.
//!
//! Parsing is delegated: [`osm_model`] loads the file into a model handle and
//! [`osm_toolkit`] extracts attribute tables from it. This crate owns the
//! request flow around them.
//!
//! ## Architecture
//!
//! - [`config`]: TOML + environment configuration
//! - [`selection`]: object-type allow-list and request selection
//! - [`upload`]: per-request temporary storage with guaranteed cleanup
//! - [`engine`]: boundary trait over the loader and toolkit
//! - [`services`]: the parse pipeline and response assembly
//! - [`http`]: axum router, handlers, and error mapping

pub mod config;
pub mod engine;
pub mod selection;
pub mod services;
pub mod upload;

#[cfg(feature = "http-server")]
pub mod http;
