//! Error handling for the query and export pipeline.
//!
//! The pure stages (filtering, sorting, pagination, projection) are total
//! functions and never produce errors for malformed record fields. Errors
//! come from caller input, the encoders, artifact delivery, the persistence
//! boundary and configuration loading.
//!
//! # Example
//!
//! ```rust
//! use railassets::error::{AssetError, ExportError, Result};
//!
//! fn check(width: usize) -> Result<()> {
//!     if width != 3 {
//!         return Err(ExportError::RowWidth { row: 0, expected: 3, found: width }.into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(check(2), Err(AssetError::Export(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{AssetError, ConfigError, ExportError, QueryError, Result, StoreError};
