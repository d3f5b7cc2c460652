//! Encoders from [`ExportModel`](super::ExportModel) to artifact bytes
//!
//! The spreadsheet and delimited-text encoders are synchronous; the
//! document encoder awaits its rendering backend.

pub mod csv;
pub mod pdf;
pub mod xlsx;

pub use csv::CsvEncoder;
pub use pdf::{DocumentBackend, DocumentRenderer, PdfEncoder, PrintPdfBackend};
pub use xlsx::XlsxEncoder;
