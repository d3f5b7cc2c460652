//! Table formatting for record pages using tabled
//!
//! Renders an [`ExportModel`] (usually one page of projected records) as a
//! terminal table. The header row comes from the model headers; long cells
//! are truncated to the configured column width.

use serde::{Deserialize, Serialize};
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::export::model::ExportModel;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Placeholder printed for a page without rows
pub const EMPTY_PAGE: &str = "(nenhum registro encontrado)";

/// Table formatter for record pages
#[derive(Debug, Clone)]
pub struct TableFormatter {
    /// Maximum column width; 0 disables truncation
    max_column_width: usize,

    /// Table style
    style: TableStyle,
}

/// Available table styles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Modern style with box-drawing characters
    #[default]
    Modern,
    /// ASCII style with basic characters
    Ascii,
    /// Markdown style
    Markdown,
    /// Psql style
    Psql,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::Modern,
        }
    }

    /// Set the table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum column width
    ///
    /// # Arguments
    /// * `width` - Maximum column width, 0 for unlimited
    ///
    /// # Returns
    /// * `Self` - Modified formatter
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// Format a model as a table
    ///
    /// # Arguments
    /// * `model` - Headers and rows to render; the title is not printed
    ///
    /// # Returns
    /// * `String` - Rendered table, or [`EMPTY_PAGE`] when there are no rows
    pub fn format(&self, model: &ExportModel) -> String {
        if model.rows.is_empty() {
            return EMPTY_PAGE.to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(model.headers.iter().cloned());
        for row in &model.rows {
            builder.push_record(row.iter().map(|cell| cell.to_string()));
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        if self.max_column_width > 0 {
            for i in 0..model.column_count() {
                table.with(
                    Modify::new(Columns::new(i..=i))
                        .with(Width::truncate(self.max_column_width).suffix("...")),
                );
            }
        }

        table.with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Markdown => table.with(Style::markdown()),
            TableStyle::Psql => table.with(Style::psql()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}
