//! Surface vertex lists and polygon areas

use osm_model::ModelObject;

use crate::error::{Error, Result};

pub type Point = [f64; 3];

/// Read the `X,Y,Z` triples of `object` starting at field `start`.
pub(crate) fn vertices(object: &ModelObject, start: usize) -> Result<Vec<Point>> {
    let mut values: Vec<&str> = object
        .fields()
        .get(start..)
        .unwrap_or_default()
        .iter()
        .map(|f| f.value.as_str())
        .collect();
    while values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }

    let invalid = |reason: String| Error::InvalidGeometry {
        class: object.class().to_string(),
        object: object
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| object.handle().to_string()),
        reason,
    };

    if values.len() % 3 != 0 {
        return Err(invalid(format!(
            "{} coordinates do not form X,Y,Z triples",
            values.len()
        )));
    }

    let mut points = Vec::with_capacity(values.len() / 3);
    for chunk in values.chunks(3) {
        let mut point = [0.0; 3];
        for (slot, raw) in point.iter_mut().zip(chunk) {
            *slot = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(format!("non-numeric coordinate '{}'", raw)))?;
        }
        points.push(point);
    }

    if points.len() < 3 {
        return Err(invalid(format!(
            "at least 3 vertices required, found {}",
            points.len()
        )));
    }

    Ok(points)
}

/// Area of a planar polygon (Newell's method).
pub fn polygon_area(points: &[Point]) -> f64 {
    let mut normal = [0.0f64; 3];
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        normal[0] += (a[1] - b[1]) * (a[2] + b[2]);
        normal[1] += (a[2] - b[2]) * (a[0] + b[0]);
        normal[2] += (a[0] - b[0]) * (a[1] + b[1]);
    }
    0.5 * (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt()
}
