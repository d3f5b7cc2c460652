//! Delimited-text encoder
//!
//! Every cell, header and the optional title line is wrapped in double
//! quotes; a title is followed by one blank line before the header row.
//! Embedded double quotes are doubled (RFC 4180), so values such as
//! `Trilho 60" TR` survive a round trip through a spreadsheet.

use tracing::debug;

use crate::error::Result;
use crate::export::model::{Cell, ExportModel};

/// Encoder for `.csv` artifacts
#[derive(Debug, Clone)]
pub struct CsvEncoder {
    /// Field separator
    separator: char,
    /// Line terminator
    line_ending: &'static str,
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvEncoder {
    /// Comma-separated, `\n`-terminated encoder
    pub fn new() -> Self {
        Self {
            separator: ',',
            line_ending: "\n",
        }
    }

    /// Use a different separator (`;` for spreadsheets in comma-decimal locales)
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Encode a model as text
    ///
    /// # Arguments
    /// * `model` - Model to encode; a zero-row model yields header-only output
    ///
    /// # Returns
    /// * `Result<String>` - The delimited text, or an error if the model is malformed
    pub fn encode_to_string(&self, model: &ExportModel) -> Result<String> {
        model.validate()?;

        let mut lines: Vec<String> = Vec::with_capacity(model.rows.len() + 3);
        if let Some(title) = &model.title {
            lines.push(Self::quote(title));
            lines.push(String::new());
        }
        lines.push(self.join(model.headers.iter().map(|h| Self::quote(h))));
        for row in &model.rows {
            lines.push(self.join(row.iter().map(Self::quote_cell)));
        }

        debug!(
            "Encoded {} rows x {} columns as CSV",
            model.rows.len(),
            model.headers.len()
        );
        Ok(lines.join(self.line_ending))
    }

    /// Encode a model as UTF-8 bytes
    pub fn encode(&self, model: &ExportModel) -> Result<Vec<u8>> {
        self.encode_to_string(model).map(String::into_bytes)
    }

    fn join(&self, fields: impl Iterator<Item = String>) -> String {
        let mut separator = [0u8; 4];
        let separator: &str = self.separator.encode_utf8(&mut separator);
        fields.collect::<Vec<_>>().join(separator)
    }

    fn quote_cell(cell: &Cell) -> String {
        Self::quote(&cell.to_string())
    }

    /// Quote a value, doubling embedded quotes
    fn quote(value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}
