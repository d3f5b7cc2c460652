//! Export pipeline
//!
//! Records are projected into a format-agnostic [`ExportModel`], encoded by
//! exactly one encoder, and the resulting [`Artifact`] is handed to an
//! [`ArtifactSink`].
//!
//! # Architecture
//!
//! 1. **Projection builders** ([`projection`]): records to model, pure
//! 2. **Encoders** ([`encoders`]): model to bytes (CSV, XLSX, PDF)
//! 3. **Sinks** ([`sink`]): bytes to a saved file or an in-memory buffer
//!
//! The [`ExportCoordinator`] runs steps 2 and 3 for one export request.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use railassets::domain::AssetKind;
//! use railassets::export::{ExportCoordinator, ExportFormat, DirectorySink};
//!
//! # async fn demo(records: Vec<railassets::record::Record>) -> railassets::error::Result<()> {
//! let model = AssetKind::Track.format_for_export(&records);
//! let coordinator = ExportCoordinator::new(Arc::new(DirectorySink::new(".")));
//! let summary = coordinator.export(&model, ExportFormat::Spreadsheet, "vias").await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod encoders;
pub mod model;
pub mod projection;
pub mod sink;

use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use coordinator::{ExportCoordinator, ExportSummary};
pub use encoders::{CsvEncoder, PdfEncoder, XlsxEncoder};
pub use model::{Cell, ExportModel};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};

/// Output encoding of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Excel workbook
    #[value(name = "xlsx")]
    #[serde(rename = "xlsx")]
    Spreadsheet,
    /// Comma-separated values
    #[value(name = "csv")]
    #[serde(rename = "csv")]
    DelimitedText,
    /// Paginated PDF
    #[value(name = "pdf")]
    #[serde(rename = "pdf")]
    Document,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::DelimitedText => "csv",
            ExportFormat::Document => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encoded export ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// Build the artifact filename
///
/// # Arguments
/// * `base` - Caller-supplied base name
/// * `format` - Determines the extension
/// * `at` - Export instant; its ISO form has colons replaced by hyphens
///
/// # Returns
/// * `String` - e.g. `vias_2024-05-01T12-30-45.xlsx`
pub fn artifact_filename(base: &str, format: ExportFormat, at: DateTime<Utc>) -> String {
    let timestamp = at.format("%Y-%m-%dT%H:%M:%S").to_string().replace(':', "-");
    format!("{}_{}.{}", base, timestamp, format.extension())
}
