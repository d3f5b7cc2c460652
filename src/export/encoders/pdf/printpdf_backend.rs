//! `printpdf` implementation of the document backend

use std::path::PathBuf;

use async_trait::async_trait;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, Rect,
};
use tracing::debug;

use crate::error::{ExportError, Result};

use super::layout::{DocumentLayout, DrawOp, FontWeight, Rgb};
use super::{DocumentBackend, DocumentRenderer};

const LAYER_NAME: &str = "Tabela";

/// Backend rendering through `printpdf`
///
/// Loading reads the optional TrueType font from disk; without one the
/// built-in Helvetica faces are used.
#[derive(Debug, Clone, Default)]
pub struct PrintPdfBackend {
    font_path: Option<PathBuf>,
}

impl PrintPdfBackend {
    /// Backend using the built-in Helvetica faces
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend embedding the TrueType font at `path`
    pub fn with_font(path: impl Into<PathBuf>) -> Self {
        Self {
            font_path: Some(path.into()),
        }
    }
}

#[async_trait]
impl DocumentBackend for PrintPdfBackend {
    async fn load(&self) -> Result<Box<dyn DocumentRenderer>> {
        let font = match &self.font_path {
            Some(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    ExportError::BackendLoad(format!("font {}: {}", path.display(), e))
                })?;
                debug!("Loaded PDF font {} ({} bytes)", path.display(), bytes.len());
                Some(bytes)
            }
            None => None,
        };
        Ok(Box::new(PrintPdfRenderer { font }))
    }
}

/// Renderer holding the loaded font data
pub struct PrintPdfRenderer {
    font: Option<Vec<u8>>,
}

impl PrintPdfRenderer {
    fn fonts(&self, doc: &PdfDocumentReference) -> Result<(IndirectFontRef, IndirectFontRef)> {
        match &self.font {
            Some(bytes) => {
                let font = doc.add_external_font(bytes.as_slice()).map_err(render_error)?;
                Ok((font.clone(), font))
            }
            None => Ok((
                doc.add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(render_error)?,
                doc.add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(render_error)?,
            )),
        }
    }
}

impl DocumentRenderer for PrintPdfRenderer {
    fn render(&self, layout: &DocumentLayout) -> Result<Vec<u8>> {
        let title = layout.title.as_deref().unwrap_or("Relatório");
        let (width, height) = (Mm(layout.width), Mm(layout.height));
        let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
        let (regular, bold) = self.fonts(&doc)?;

        for (index, page) in layout.pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) = doc.add_page(width, height, LAYER_NAME);
                doc.get_page(page_index).get_layer(layer_index)
            };

            // Layout y grows downwards from the top edge; PDF y grows upwards.
            let flip = |y: f32| Mm(layout.height - y);

            for op in &page.ops {
                match op {
                    DrawOp::FillRect {
                        x,
                        y,
                        width,
                        height,
                        color,
                    } => {
                        layer.set_fill_color(pdf_color(*color));
                        let rect = Rect::new(Mm(*x), flip(*y + *height), Mm(*x + *width), flip(*y))
                            .with_mode(PaintMode::Fill);
                        layer.add_rect(rect);
                    }
                    DrawOp::Text {
                        x,
                        y,
                        size,
                        weight,
                        color,
                        text,
                    } => {
                        let font = match weight {
                            FontWeight::Regular => &regular,
                            FontWeight::Bold => &bold,
                        };
                        layer.set_fill_color(pdf_color(*color));
                        layer.use_text(text.as_str(), *size, Mm(*x), flip(*y), font);
                    }
                }
            }
        }

        doc.save_to_bytes().map_err(render_error)
    }
}

fn pdf_color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn render_error(err: impl std::fmt::Display) -> crate::error::AssetError {
    ExportError::EncodeFailed {
        format: "pdf".to_string(),
        message: err.to_string(),
    }
    .into()
}
