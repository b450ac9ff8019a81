//! HTTP server module for the OSM parser.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Multipart upload and query parsing                     │
//! │  - JSON serialization, CORS, compression, error mapping   │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Scoped temp storage, blocking pipeline                 │
//! │  - Failure policy, response assembly                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Engine (engine.rs)                                       │
//! │  - osm-model loader, osm-toolkit extraction               │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod docs;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
