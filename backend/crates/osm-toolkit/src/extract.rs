//! Attribute extraction per object type

use std::collections::HashMap;

use osm_model::{Handle, Model, ModelObject};

use crate::error::Result;
use crate::geometry::{self, polygon_area};
use crate::object_type::ObjectType;
use crate::table::{Cell, Table, TableBuilder};

pub const VERTEX_COUNT_COLUMN: &str = "Vertex Count";
pub const GROSS_AREA_COLUMN: &str = "Gross Area {m2}";
pub const FLOOR_AREA_COLUMN: &str = "Floor Area {m2}";

// Field positions from the OpenStudio IDD, used when the file carries no
// field-name comments.
const SURFACE_TYPE_FIELD: usize = 2;
const SURFACE_SPACE_FIELD: usize = 4;
const SURFACE_FIRST_VERTEX: usize = 11;
const SUBSURFACE_FIRST_VERTEX: usize = 10;

/// Extract the table for `object_type` from a loaded model.
///
/// One row per object of the type's class, in file order. Columns are the
/// object's named fields; handle references are replaced by the referenced
/// object's name. Surfaces and sub-surfaces gain vertex count and gross
/// area, spaces gain the total area of their floor surfaces.
pub fn extract(model: &Model, object_type: ObjectType) -> Result<Table> {
    let floor_areas = match object_type {
        ObjectType::Spaces => floor_areas_by_space(model)?,
        _ => HashMap::new(),
    };

    let mut builder = TableBuilder::default();
    for object in model.objects_of_class(object_type.class()) {
        let mut row = attribute_row(model, object);
        match object_type {
            ObjectType::Surfaces | ObjectType::Subsurfaces => {
                let points = geometry::vertices(object, first_vertex(object, object_type))?;
                row.push((VERTEX_COUNT_COLUMN.to_string(), Cell::Integer(points.len() as i64)));
                row.push((GROSS_AREA_COLUMN.to_string(), Cell::Real(polygon_area(&points))));
            }
            ObjectType::Spaces => {
                let area = floor_areas.get(object.handle()).copied().unwrap_or(0.0);
                row.push((FLOOR_AREA_COLUMN.to_string(), Cell::Real(area)));
            }
            _ => {}
        }
        builder.push_row(row);
    }

    Ok(builder.finish())
}

fn attribute_row(model: &Model, object: &ModelObject) -> Vec<(String, Cell)> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    object
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let base = match (&field.name, idx) {
                (Some(name), _) => name.clone(),
                (None, 0) => "Handle".to_string(),
                (None, _) => format!("Field {}", idx + 1),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let column = if *count == 1 {
                base
            } else {
                format!("{} ({})", base, count)
            };

            let cell = if idx == 0 || column == "Name" {
                Cell::text(&field.value)
            } else if Handle::parse(&field.value).is_some() {
                let name = model.resolve(&field.value).and_then(ModelObject::name);
                Cell::text(name.unwrap_or(field.value.as_str()))
            } else {
                Cell::from_raw(&field.value)
            };
            (column, cell)
        })
        .collect()
}

fn first_vertex(object: &ModelObject, object_type: ObjectType) -> usize {
    object
        .fields()
        .iter()
        .position(|f| f.name.as_deref() == Some("Number of Vertices"))
        .map(|idx| idx + 1)
        .unwrap_or(match object_type {
            ObjectType::Subsurfaces => SUBSURFACE_FIRST_VERTEX,
            _ => SURFACE_FIRST_VERTEX,
        })
}

fn labelled_or_positional<'a>(object: &'a ModelObject, name: &str, idx: usize) -> Option<&'a str> {
    object.field(name).or_else(|| {
        if object.fields().iter().any(|f| f.name.is_some()) {
            None
        } else {
            object.value(idx)
        }
    })
}

fn floor_areas_by_space(model: &Model) -> Result<HashMap<Handle, f64>> {
    let mut areas = HashMap::new();
    for surface in model.objects_of_class(ObjectType::Surfaces.class()) {
        let is_floor = labelled_or_positional(surface, "Surface Type", SURFACE_TYPE_FIELD)
            .is_some_and(|t| t.eq_ignore_ascii_case("Floor"));
        let space = labelled_or_positional(surface, "Space Name", SURFACE_SPACE_FIELD)
            .and_then(Handle::parse);
        if let (true, Some(space)) = (is_floor, space) {
            let points = geometry::vertices(surface, first_vertex(surface, ObjectType::Surfaces))?;
            *areas.entry(space).or_insert(0.0) += polygon_area(&points);
        }
    }
    Ok(areas)
}
