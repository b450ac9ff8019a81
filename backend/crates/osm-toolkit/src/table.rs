//! Tabular extraction output

use std::collections::HashMap;

use serde::Serialize;

/// A scalar table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    /// Interpret a raw field value: blank becomes `Null`, finite numbers become
    /// `Integer` or `Real`, anything else is `Text`.
    pub fn from_raw(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Cell::Null;
        }
        if let Ok(int) = value.parse::<i64>() {
            return Cell::Integer(int);
        }
        match value.parse::<f64>() {
            Ok(real) if real.is_finite() && looks_numeric(value) => Cell::Real(real),
            _ => Cell::Text(value.to_string()),
        }
    }

    /// Text cell, `Null` when blank.
    pub fn text(value: &str) -> Self {
        if value.trim().is_empty() {
            Cell::Null
        } else {
            Cell::Text(value.trim().to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(v) => Some(v),
            _ => None,
        }
    }
}

// `f64::from_str` also accepts words such as "inf" and "NaN".
fn looks_numeric(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

/// Rows of scalar cells under ordered column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` under column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Each row as `(column, cell)` pairs in column order.
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &Cell)>> + '_ {
        self.rows.iter().map(move |row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter())
                .collect()
        })
    }
}

/// Builds a [`Table`] from rows that may carry different column sets.
///
/// Columns are ordered by first appearance; cells missing from a row are
/// `Null`.
#[derive(Debug, Default)]
pub(crate) struct TableBuilder {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<(usize, Cell)>>,
}

impl TableBuilder {
    pub(crate) fn push_row(&mut self, cells: Vec<(String, Cell)>) {
        let mut row = Vec::with_capacity(cells.len());
        for (name, cell) in cells {
            let idx = match self.index.get(&name) {
                Some(&idx) => idx,
                None => {
                    let idx = self.columns.len();
                    self.index.insert(name.clone(), idx);
                    self.columns.push(name);
                    idx
                }
            };
            row.push((idx, cell));
        }
        self.rows.push(row);
    }

    pub(crate) fn finish(self) -> Table {
        let width = self.columns.len();
        let rows = self
            .rows
            .into_iter()
            .map(|cells| {
                let mut row = vec![Cell::Null; width];
                for (idx, cell) in cells {
                    row[idx] = cell;
                }
                row
            })
            .collect();
        Table {
            columns: self.columns,
            rows,
        }
    }
}
