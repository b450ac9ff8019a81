//! Conversion of extracted tables into JSON response values.

use osm_toolkit::{Cell, ObjectType, Table};
use serde_json::{json, Map, Number, Value};

/// Ordered array of flat records; record keys follow the table's columns.
pub fn table_to_records(table: &Table) -> Value {
    let records = table
        .records()
        .map(|record| {
            let object: Map<String, Value> = record
                .into_iter()
                .map(|(column, cell)| (column.to_string(), cell_to_value(cell)))
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(records)
}

/// Value placed under an object type whose extraction failed.
pub fn extraction_error(object_type: ObjectType, error: &osm_toolkit::Error) -> Value {
    json!({ "error": format!("Error processing {}: {}", object_type, error) })
}

fn cell_to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Integer(v) => Value::Number((*v).into()),
        Cell::Real(v) => Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
        Cell::Text(v) => Value::String(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let model: osm_model::Model = "\
OS:Version,{v},3.4.0;
OS:ThermalZone,
  {z1},  !- Handle
  Zone 1,  !- Name
  2;  !- Multiplier
OS:ThermalZone,
  {z2},  !- Handle
  Zone 2,  !- Name
  ,  !- Multiplier
  0.5;  !- Ceiling Height {m}
"
        .parse()
        .unwrap();
        osm_toolkit::extract(&model, ObjectType::ThermalZones).unwrap()
    }

    #[test]
    fn records_keep_column_order_and_scalar_types() {
        let records = table_to_records(&sample_table());
        let rows = records.as_array().unwrap();
        assert_eq!(rows.len(), 2);

        let keys: Vec<_> = rows[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Handle", "Name", "Multiplier", "Ceiling Height {m}"]);

        assert_eq!(rows[0]["Multiplier"], json!(2));
        assert_eq!(rows[0]["Ceiling Height {m}"], Value::Null);
        assert_eq!(rows[1]["Multiplier"], Value::Null);
        assert_eq!(rows[1]["Ceiling Height {m}"], json!(0.5));
        assert_eq!(rows[1]["Name"], json!("Zone 2"));
    }

    #[test]
    fn empty_table_becomes_empty_array() {
        assert_eq!(table_to_records(&Table::default()), json!([]));
    }

    #[test]
    fn error_value_names_the_type() {
        let err = osm_toolkit::Error::InvalidGeometry {
            class: "OS:Surface".into(),
            object: "Wall".into(),
            reason: "at least 3 vertices required, found 2".into(),
        };
        let value = extraction_error(ObjectType::Surfaces, &err);
        assert_eq!(
            value["error"],
            json!(
                "Error processing surfaces: Invalid geometry for OS:Surface 'Wall': \
                 at least 3 vertices required, found 2"
            )
        );
    }
}
