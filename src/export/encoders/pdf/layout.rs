//! Page layout for the document encoder
//!
//! Produces backend-independent draw operations in millimetres, measured
//! from the top-left corner of the page. The title is drawn once at the top
//! of the first page; the header row is repeated on every page with a
//! filled background; body rows alternate between no fill and a light
//! stripe. Rows that do not fit continue on a new page.

use serde::{Deserialize, Serialize};

use crate::export::model::ExportModel;

/// Millimetres per typographic point
const MM_PER_PT: f32 = 0.352_778;

/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// RGB colour with 0-255 channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Font weight of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Page orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Filled rectangle; `y` is the top edge
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// Text run; `y` is the baseline
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        color: Rgb,
        text: String,
    },
}

/// Draw operations of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
    /// Indices (into the model rows) drawn on this page
    pub rows: std::ops::Range<usize>,
}

/// A laid-out document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: Option<String>,
    pub width: f32,
    pub height: f32,
    pub pages: Vec<PageLayout>,
}

/// Page geometry and styling
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    pub orientation: Orientation,
    pub margin: f32,
    pub title_size: f32,
    pub font_size: f32,
    pub row_height: f32,
    pub cell_padding: f32,
    pub header_fill: Rgb,
    pub header_text: Rgb,
    pub stripe_fill: Rgb,
    pub body_text: Rgb,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            orientation: Orientation::Landscape,
            margin: 14.0,
            title_size: 16.0,
            font_size: 8.0,
            row_height: 7.0,
            cell_padding: 1.5,
            header_fill: Rgb(41, 128, 185),
            header_text: Rgb::WHITE,
            stripe_fill: Rgb(245, 245, 245),
            body_text: Rgb(50, 50, 50),
        }
    }
}

impl PageSetup {
    /// A4 page size in millimetres for the configured orientation
    pub fn page_size(&self) -> (f32, f32) {
        match self.orientation {
            Orientation::Landscape => (297.0, 210.0),
            Orientation::Portrait => (210.0, 297.0),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Vertical space taken by the title block on the first page
    fn title_block(&self) -> f32 {
        self.title_size * MM_PER_PT + 6.0
    }

    /// How many characters fit in a column of `width` millimetres
    fn chars_per_column(&self, width: f32) -> usize {
        let glyph = self.font_size * MM_PER_PT * AVG_GLYPH_WIDTH;
        let usable = (width - 2.0 * self.cell_padding).max(0.0);
        (usable / glyph).floor() as usize
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`
fn fit_text(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

/// Lay out `model` on A4 pages
///
/// # Arguments
/// * `model` - Validated export model
/// * `setup` - Page geometry and styling
///
/// # Returns
/// * `DocumentLayout` - At least one page; a zero-row model yields one page
///   holding the title and the header row
pub fn layout_document(model: &ExportModel, setup: &PageSetup) -> DocumentLayout {
    let (width, height) = setup.page_size();
    let table_width = width - 2.0 * setup.margin;
    let columns = model.headers.len().max(1);
    let column_width = table_width / columns as f32;
    let max_chars = setup.chars_per_column(column_width);
    let baseline_offset = (setup.row_height + setup.font_size * MM_PER_PT) / 2.0;
    let bottom = height - setup.margin;

    let text_row = |ops: &mut Vec<DrawOp>,
                    y: f32,
                    cells: Vec<String>,
                    weight: FontWeight,
                    color: Rgb| {
        for (col, cell) in cells.iter().enumerate() {
            let text = fit_text(cell, max_chars);
            if text.is_empty() {
                continue;
            }
            ops.push(DrawOp::Text {
                x: setup.margin + col as f32 * column_width + setup.cell_padding,
                y: y + baseline_offset,
                size: setup.font_size,
                weight,
                color,
                text,
            });
        }
    };

    let start_page = |first: bool, row: usize| -> (PageLayout, f32) {
        let mut page = PageLayout {
            ops: Vec::new(),
            rows: row..row,
        };
        let mut y = setup.margin;

        if first {
            if let Some(title) = &model.title {
                page.ops.push(DrawOp::Text {
                    x: setup.margin,
                    y: y + setup.title_size * MM_PER_PT,
                    size: setup.title_size,
                    weight: FontWeight::Bold,
                    color: Rgb::BLACK,
                    text: title.clone(),
                });
                y += setup.title_block();
            }
        }

        page.ops.push(DrawOp::FillRect {
            x: setup.margin,
            y,
            width: table_width,
            height: setup.row_height,
            color: setup.header_fill,
        });
        text_row(
            &mut page.ops,
            y,
            model.headers.clone(),
            FontWeight::Bold,
            setup.header_text,
        );
        (page, y + setup.row_height)
    };

    let mut pages = Vec::new();
    let (mut page, mut y) = start_page(true, 0);

    for (index, row) in model.rows.iter().enumerate() {
        // A page always takes at least one body row, even if the title
        // pushed the header near the bottom margin.
        if y + setup.row_height > bottom && page.rows.start < index {
            pages.push(page);
            (page, y) = start_page(false, index);
        }

        if index % 2 == 1 {
            page.ops.push(DrawOp::FillRect {
                x: setup.margin,
                y,
                width: table_width,
                height: setup.row_height,
                color: setup.stripe_fill,
            });
        }
        text_row(
            &mut page.ops,
            y,
            row.iter().map(ToString::to_string).collect(),
            FontWeight::Regular,
            setup.body_text,
        );
        page.rows.end = index + 1;
        y += setup.row_height;
    }
    pages.push(page);

    DocumentLayout {
        title: model.title.clone(),
        width,
        height,
        pages,
    }
}
