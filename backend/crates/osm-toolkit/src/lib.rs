//! # osm-toolkit
//!
//! Walks a loaded [`osm_model::Model`] and extracts one attribute table per
//! object type.
//!
//! ```rust,ignore
//! use osm_model::Model;
//! use osm_toolkit::{extract, ObjectType};
//!
//! let model = Model::from_file("office.osm")?;
//! let spaces = extract(&model, ObjectType::Spaces)?;
//! for record in spaces.records() {
//!     println!("{:?}", record);
//! }
//! ```

mod error;
mod extract;
pub mod geometry;
mod object_type;
mod table;

pub use error::{Error, Result};
pub use extract::{extract, FLOOR_AREA_COLUMN, GROSS_AREA_COLUMN, VERTEX_COUNT_COLUMN};
pub use object_type::ObjectType;
pub use table::{Cell, Table};
