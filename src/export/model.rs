//! Format-agnostic tabular model consumed by every encoder

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExportError, Result};
use crate::record::{format_number, value_to_text};

/// One table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Text cell, or [`Cell::Empty`] for the empty string
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { Cell::Empty } else { Cell::Text(s) }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Number(n) => f.write_str(&format_number(*n)),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            other => Cell::text(value_to_text(other)),
        }
    }
}

impl From<Option<&Value>> for Cell {
    fn from(value: Option<&Value>) -> Self {
        value.map(Cell::from).unwrap_or_default()
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// Title, headers and rows of an export
///
/// Every row has exactly one cell per header; [`ExportModel::push_row`]
/// enforces it and encoders re-check with [`ExportModel::validate`].
/// Row order is whatever the caller supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportModel {
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ExportModel {
    /// Create a model with the given headers and no rows
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Set the title (builder style); an empty title is treated as none
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
        self
    }

    /// Append a row
    ///
    /// # Arguments
    /// * `row` - Cells in header order
    ///
    /// # Returns
    /// * `Result<()>` - Error when the row width differs from the header count
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(ExportError::RowWidth {
                row: self.rows.len(),
                expected: self.headers.len(),
                found: row.len(),
            }
            .into());
        }
        self.rows.push(row);
        Ok(())
    }

    /// Check the row width invariant
    pub fn validate(&self) -> Result<()> {
        let expected = self.headers.len();
        match self.rows.iter().position(|row| row.len() != expected) {
            Some(index) => Err(ExportError::RowWidth {
                row: index,
                expected,
                found: self.rows[index].len(),
            }
            .into()),
            None => Ok(()),
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
