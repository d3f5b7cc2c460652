//! Export coordinator
//!
//! Runs one export request: encode the model with the selected encoder,
//! wrap the bytes in an [`Artifact`] and hand it to the sink exactly once.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;

use super::encoders::{CsvEncoder, PdfEncoder, XlsxEncoder};
use super::model::ExportModel;
use super::sink::ArtifactSink;
use super::{Artifact, ExportFormat, artifact_filename};

/// Result of an export operation
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Delivered filename
    pub filename: String,
    /// Encoding used
    pub format: ExportFormat,
    /// Number of data rows exported
    pub rows: usize,
    /// Artifact size in bytes
    pub bytes: usize,
    /// Time taken for encode and delivery
    pub elapsed_ms: u64,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exported {} row(s) to {} ({} bytes, {}ms)",
            self.rows, self.filename, self.bytes, self.elapsed_ms
        )
    }
}

/// Coordinator for export operations
///
/// Holds one encoder per format and the sink that receives artifacts.
/// Concurrent exports are independent; nothing is queued or shared
/// between them beyond the sink.
pub struct ExportCoordinator {
    sink: Arc<dyn ArtifactSink>,
    csv: CsvEncoder,
    xlsx: XlsxEncoder,
    pdf: PdfEncoder,
}

impl ExportCoordinator {
    /// Create a coordinator with default encoders
    pub fn new(sink: Arc<dyn ArtifactSink>) -> Self {
        Self {
            sink,
            csv: CsvEncoder::default(),
            xlsx: XlsxEncoder::default(),
            pdf: PdfEncoder::default(),
        }
    }

    pub fn with_csv(mut self, encoder: CsvEncoder) -> Self {
        self.csv = encoder;
        self
    }

    pub fn with_xlsx(mut self, encoder: XlsxEncoder) -> Self {
        self.xlsx = encoder;
        self
    }

    pub fn with_pdf(mut self, encoder: PdfEncoder) -> Self {
        self.pdf = encoder;
        self
    }

    /// Encode a model without delivering it
    pub async fn encode(&self, model: &ExportModel, format: ExportFormat) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Spreadsheet => self.xlsx.encode(model),
            ExportFormat::DelimitedText => self.csv.encode(model),
            ExportFormat::Document => self.pdf.encode(model).await,
        }
    }

    /// Export a model, timestamping the filename with the current time
    ///
    /// # Arguments
    /// * `model` - Rows to export, already filtered and ordered
    /// * `format` - Selected encoding
    /// * `base_name` - Filename prefix
    ///
    /// # Returns
    /// * `Result<ExportSummary>` - Summary, or the encode/delivery failure
    pub async fn export(
        &self,
        model: &ExportModel,
        format: ExportFormat,
        base_name: &str,
    ) -> Result<ExportSummary> {
        self.export_at(model, format, base_name, Utc::now()).await
    }

    /// Export a model with an explicit timestamp
    pub async fn export_at(
        &self,
        model: &ExportModel,
        format: ExportFormat,
        base_name: &str,
        at: DateTime<Utc>,
    ) -> Result<ExportSummary> {
        let start = Instant::now();
        let filename = artifact_filename(base_name, format, at);
        debug!("Exporting {} row(s) as {}", model.row_count(), format);

        let result = self.encode_and_deliver(model, format, filename).await;
        match result {
            Ok(artifact) => {
                let summary = ExportSummary {
                    filename: artifact.filename,
                    format,
                    rows: model.row_count(),
                    bytes: artifact.bytes.len(),
                    elapsed_ms: start.elapsed().as_millis() as u64,
                };
                info!("{}", summary);
                Ok(summary)
            }
            Err(e) => {
                warn!("Export as {} failed: {}", format, e);
                Err(e)
            }
        }
    }

    async fn encode_and_deliver(
        &self,
        model: &ExportModel,
        format: ExportFormat,
        filename: String,
    ) -> Result<Artifact> {
        let bytes = self.encode(model, format).await?;
        let artifact = Artifact {
            filename,
            format,
            bytes,
        };
        self.sink.deliver(&artifact).await?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssetError, ExportError};
    use crate::export::encoders::{DocumentBackend, DocumentRenderer};
    use crate::export::model::Cell;
    use crate::export::sink::MemorySink;
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn model() -> ExportModel {
        let mut model = ExportModel::new(["Código", "Estado"]).with_title("Relatório de Vias");
        model
            .push_row(vec![Cell::from("A-1"), Cell::from("Ativo")])
            .unwrap();
        model
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_export_delivers_once() {
        let sink = Arc::new(MemorySink::new());
        let coordinator = ExportCoordinator::new(sink.clone());

        let summary = coordinator
            .export_at(&model(), ExportFormat::DelimitedText, "relatorio_vias", at())
            .await
            .unwrap();

        assert_eq!(summary.filename, "relatorio_vias_2024-03-09T08-05-01.csv");
        assert_eq!(summary.rows, 1);
        let delivered = sink.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].bytes.len(), summary.bytes);
        assert!(String::from_utf8_lossy(&delivered[0].bytes).contains("\"A-1\""));
    }

    #[tokio::test]
    async fn test_zero_rows_every_format() {
        let sink = Arc::new(MemorySink::new());
        let coordinator = ExportCoordinator::new(sink.clone());
        let empty = ExportModel::new(["Código", "Estado"]);

        for format in [
            ExportFormat::Spreadsheet,
            ExportFormat::DelimitedText,
            ExportFormat::Document,
        ] {
            let summary = coordinator
                .export_at(&empty, format, "vazio", at())
                .await
                .unwrap();
            assert_eq!(summary.rows, 0);
            assert!(summary.bytes > 0);
        }
        assert_eq!(sink.delivered().len(), 3);
    }

    struct Unavailable;

    #[async_trait]
    impl DocumentBackend for Unavailable {
        async fn load(&self) -> Result<Box<dyn DocumentRenderer>> {
            Err(ExportError::BackendLoad("not installed".to_string()).into())
        }
    }

    #[tokio::test]
    async fn test_encoder_failure_delivers_nothing() {
        let sink = Arc::new(MemorySink::new());
        let coordinator = ExportCoordinator::new(sink.clone())
            .with_pdf(PdfEncoder::new(Arc::new(Unavailable)));

        let err = coordinator
            .export_at(&model(), ExportFormat::Document, "x", at())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AssetError::Export(ExportError::BackendLoad(_))
        ));
        assert!(sink.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_misaligned_model_rejected() {
        let sink = Arc::new(MemorySink::new());
        let coordinator = ExportCoordinator::new(sink.clone());
        let mut bad = ExportModel::new(["A", "B"]);
        bad.rows.push(vec![Cell::Empty]);

        let result = coordinator
            .export_at(&bad, ExportFormat::Spreadsheet, "x", at())
            .await;
        assert!(result.is_err());
        assert!(sink.delivered().is_empty());
    }
}
