//! Spreadsheet encoder backed by `rust_xlsxwriter`
//!
//! Placement is computed by [`layout_sheet`] so it can be checked without
//! opening the produced workbook. With a title, row 1 holds the title, row 2
//! stays blank and the headers start on row 3; without one the headers
//! occupy row 1. Data rows follow the header row in model order.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::export::model::{Cell, ExportModel};

/// Excel limits
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;
const MAX_SHEET_NAME: usize = 31;

/// Visual role of a placed cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Title,
    Header,
    Body,
}

/// A cell at a zero-based sheet position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCell<'a> {
    pub row: u32,
    pub col: u16,
    pub role: CellRole,
    pub value: SheetValue<'a>,
}

/// Borrowed cell content
#[derive(Debug, Clone, PartialEq)]
pub enum SheetValue<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
}

/// Compute where every non-empty cell of `model` lands
///
/// # Arguments
/// * `model` - Validated export model
///
/// # Returns
/// * `Result<Vec<PlacedCell>>` - Cells in row-major order, or an error when
///   the model exceeds the sheet limits
pub fn layout_sheet(model: &ExportModel) -> Result<Vec<PlacedCell<'_>>> {
    model.validate()?;

    if model.headers.len() > MAX_COLUMNS {
        return Err(ExportError::TooLarge(format!(
            "{} columns exceed the spreadsheet limit of {MAX_COLUMNS}",
            model.headers.len()
        ))
        .into());
    }

    let header_row: usize = if model.title.is_some() { 2 } else { 0 };
    if header_row + 1 + model.rows.len() > MAX_ROWS {
        return Err(ExportError::TooLarge(format!(
            "{} rows exceed the spreadsheet limit of {MAX_ROWS}",
            model.rows.len()
        ))
        .into());
    }

    let mut cells = Vec::with_capacity((model.rows.len() + 1) * model.headers.len() + 1);
    if let Some(title) = &model.title {
        cells.push(PlacedCell {
            row: 0,
            col: 0,
            role: CellRole::Title,
            value: SheetValue::Text(title),
        });
    }

    for (col, header) in model.headers.iter().enumerate() {
        cells.push(PlacedCell {
            row: header_row as u32,
            col: col as u16,
            role: CellRole::Header,
            value: SheetValue::Text(header),
        });
    }

    for (index, row) in model.rows.iter().enumerate() {
        let sheet_row = (header_row + 1 + index) as u32;
        for (col, cell) in row.iter().enumerate() {
            let value = match cell {
                Cell::Empty => continue,
                Cell::Text(s) => SheetValue::Text(s),
                Cell::Number(n) => SheetValue::Number(*n),
                Cell::Bool(b) => SheetValue::Bool(*b),
            };
            cells.push(PlacedCell {
                row: sheet_row,
                col: col as u16,
                role: CellRole::Body,
                value,
            });
        }
    }

    Ok(cells)
}

/// Encoder for `.xlsx` artifacts
#[derive(Debug, Clone)]
pub struct XlsxEncoder {
    sheet_name: String,
    autofit: bool,
}

impl Default for XlsxEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxEncoder {
    /// Single-sheet encoder with autofit columns
    pub fn new() -> Self {
        Self {
            sheet_name: "Dados".to_string(),
            autofit: true,
        }
    }

    /// Name the worksheet (truncated to the 31-character limit)
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into().chars().take(MAX_SHEET_NAME).collect();
        self
    }

    /// Toggle column autofit
    pub fn with_autofit(mut self, autofit: bool) -> Self {
        self.autofit = autofit;
        self
    }

    /// Encode a model as workbook bytes
    ///
    /// # Arguments
    /// * `model` - Model to encode; a zero-row model yields a header-only sheet
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - The `.xlsx` file contents
    pub fn encode(&self, model: &ExportModel) -> Result<Vec<u8>> {
        let cells = layout_sheet(model)?;
        let bytes = self.write_workbook(&cells).map_err(Self::encode_error)?;

        debug!(
            "Encoded {} rows x {} columns as XLSX ({} bytes)",
            model.rows.len(),
            model.headers.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    fn write_workbook(&self, cells: &[PlacedCell<'_>]) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let title_format = Format::new().set_bold().set_font_size(14);
        let header_format = Format::new().set_bold().set_background_color("#D9E1F2");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for cell in cells {
            match (&cell.value, cell.role) {
                (SheetValue::Text(s), CellRole::Title) => {
                    worksheet.write_string_with_format(cell.row, cell.col, *s, &title_format)?;
                }
                (SheetValue::Text(s), CellRole::Header) => {
                    worksheet.write_string_with_format(cell.row, cell.col, *s, &header_format)?;
                }
                (SheetValue::Text(s), CellRole::Body) => {
                    worksheet.write_string(cell.row, cell.col, *s)?;
                }
                (SheetValue::Number(n), _) => {
                    worksheet.write_number(cell.row, cell.col, *n)?;
                }
                (SheetValue::Bool(b), _) => {
                    worksheet.write_boolean(cell.row, cell.col, *b)?;
                }
            }
        }

        if self.autofit {
            worksheet.autofit();
        }

        workbook.save_to_buffer()
    }

    fn encode_error(err: XlsxError) -> crate::error::AssetError {
        ExportError::EncodeFailed {
            format: "xlsx".to_string(),
            message: err.to_string(),
        }
        .into()
    }
}
