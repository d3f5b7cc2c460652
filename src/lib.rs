//! Railway Asset Query & Export Library
//!
//! The query and export pipeline behind the railway asset console: an
//! in-memory engine that filters, sorts and pages a fetched collection of
//! schema-less asset records, and turns any tabular projection of them
//! into spreadsheet, CSV or PDF artifacts.
//!
//! # Modules
//!
//! - `record`: Schema-less record type and total field accessors
//! - `query`: Filter predicate engine, sort comparator, paginator
//! - `domain`: Asset kinds with their search fields and default filters
//! - `export`: Projection builders, encoders, artifact sinks
//! - `store`: Record persistence boundary
//! - `formatter`: Terminal table output
//! - `config`: Configuration management
//! - `cli`: Command-line interface and argument parsing
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```
//! use railassets::domain::AssetKind;
//! use railassets::query::{Query, SortSpec};
//! use railassets::record::Record;
//!
//! let records = vec![
//!     Record::new().with("codigo", "A-1").with("estado", "Ativo"),
//!     Record::new().with("codigo", "B-1").with("estado", "Manutenção"),
//! ];
//!
//! let mut filters = AssetKind::Track.default_filters();
//! filters.set("estado", "Ativo").unwrap();
//!
//! let result = Query::new(filters, 10)
//!     .sorted_by(SortSpec::desc("codigo"))
//!     .run(&records);
//! assert_eq!(result.items.len(), 1);
//! assert_eq!(result.active_filters, 1);
//!
//! let model = AssetKind::Track.format_for_export(&result.ordered);
//! assert_eq!(model.rows.len(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod formatter;
pub mod query;
pub mod record;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use domain::AssetKind;
pub use error::{AssetError, Result};
pub use export::{ExportCoordinator, ExportFormat, ExportModel};
pub use query::{FilterState, Query, QueryResult, SortSpec};
pub use record::Record;
pub use store::RecordStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
