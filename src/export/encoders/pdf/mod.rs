//! Paginated-document encoder
//!
//! The only export step that suspends: the rendering backend is acquired
//! asynchronously through [`DocumentBackend::load`] before the pages are
//! built. The backend is injected, so the layout logic in [`layout`] is
//! testable on its own and tests can swap in a recording renderer.

pub mod layout;
pub mod printpdf_backend;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::export::model::ExportModel;

pub use layout::{DocumentLayout, DrawOp, FontWeight, Orientation, PageLayout, PageSetup, Rgb};
pub use printpdf_backend::PrintPdfBackend;

/// Asynchronously acquired rendering capability
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Acquire a renderer
    ///
    /// # Returns
    /// * `Result<Box<dyn DocumentRenderer>>` - Ready renderer, or
    ///   [`crate::error::ExportError::BackendLoad`] when the dependency is unavailable
    async fn load(&self) -> Result<Box<dyn DocumentRenderer>>;
}

/// Turns a laid-out document into file bytes
pub trait DocumentRenderer: Send {
    fn render(&self, layout: &DocumentLayout) -> Result<Vec<u8>>;
}

/// Encoder for `.pdf` artifacts
#[derive(Clone)]
pub struct PdfEncoder {
    backend: Arc<dyn DocumentBackend>,
    setup: PageSetup,
}

impl PdfEncoder {
    /// Create an encoder over an injected backend
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            setup: PageSetup::default(),
        }
    }

    /// Override the page setup
    pub fn with_setup(mut self, setup: PageSetup) -> Self {
        self.setup = setup;
        self
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Encode a model as document bytes
    ///
    /// # Arguments
    /// * `model` - Model to encode; a zero-row model yields a header-only page
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - Document bytes, or the backend/render failure
    pub async fn encode(&self, model: &ExportModel) -> Result<Vec<u8>> {
        model.validate()?;
        let renderer = self.backend.load().await?;
        let layout = layout::layout_document(model, &self.setup);
        debug!(
            "Laid out {} rows on {} page(s)",
            model.rows.len(),
            layout.pages.len()
        );
        renderer.render(&layout)
    }
}

impl Default for PdfEncoder {
    fn default() -> Self {
        Self::new(Arc::new(PrintPdfBackend::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::export::model::Cell;
    use std::sync::Mutex;

    /// Renderer that records the layout it was given
    struct Recording(Arc<Mutex<Option<DocumentLayout>>>);

    impl DocumentRenderer for Recording {
        fn render(&self, layout: &DocumentLayout) -> Result<Vec<u8>> {
            *self.0.lock().unwrap() = Some(layout.clone());
            Ok(b"layout".to_vec())
        }
    }

    struct RecordingBackend(Arc<Mutex<Option<DocumentLayout>>>);

    #[async_trait]
    impl DocumentBackend for RecordingBackend {
        async fn load(&self) -> Result<Box<dyn DocumentRenderer>> {
            Ok(Box::new(Recording(self.0.clone())))
        }
    }

    struct Unavailable;

    #[async_trait]
    impl DocumentBackend for Unavailable {
        async fn load(&self) -> Result<Box<dyn DocumentRenderer>> {
            Err(ExportError::BackendLoad("offline".to_string()).into())
        }
    }

    #[tokio::test]
    async fn test_encoder_renders_layout_through_backend() {
        let seen = Arc::new(Mutex::new(None));
        let encoder = PdfEncoder::new(Arc::new(RecordingBackend(seen.clone())));
        let mut model = ExportModel::new(["A"]);
        model.push_row(vec![Cell::from("x")]).unwrap();

        let bytes = encoder.encode(&model).await.unwrap();
        assert_eq!(bytes, b"layout");
        let layout = seen.lock().unwrap().clone().unwrap();
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.pages[0].rows, 0..1);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let encoder = PdfEncoder::new(Arc::new(Unavailable));
        let err = encoder.encode(&ExportModel::new(["A"])).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[tokio::test]
    async fn test_zero_rows_real_backend() {
        let bytes = PdfEncoder::default()
            .encode(&ExportModel::new(["A", "B"]))
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
