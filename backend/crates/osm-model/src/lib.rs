//! # osm-model
//!
//! Loads OpenStudio Model (`.osm`) files into an in-memory model handle.
//!
//! A model is an ordered list of objects. Every object has a class name
//! (`OS:Space`, `OS:Surface`, ...), a `{uuid}` handle in its first field, and
//! ordered fields whose names come from the `!-` comments of the file.
//!
//! ## Example
//!
//! ```rust,ignore
//! use osm_model::Model;
//!
//! let model = Model::from_file("office.osm")?;
//! println!("OpenStudio {}", model.version().unwrap_or("unknown"));
//! println!("{} spaces", model.objects_of_class("OS:Space").count());
//! ```
//!
//! Loading fails when the content is not UTF-8 text, is structurally broken,
//! uses classes outside the `OS:` namespace, or has no `OS:Version` object.

mod error;
mod model;
mod reader;

pub use error::{Error, Result};
pub use model::{Field, Handle, Model, ModelObject, VERSION_CLASS};
