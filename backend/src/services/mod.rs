//! Parse pipeline services.
//!
//! [`parse::parse_model_file`] runs the pipeline synchronously;
//! [`parse::parse_upload`] moves it onto tokio's blocking pool for handlers.

pub mod assembly;
pub mod error;
pub mod parse;

pub use error::{ParseError, ParseResult};
pub use parse::{parse_model_file, parse_upload, ParseRequest, ParseResponse};
