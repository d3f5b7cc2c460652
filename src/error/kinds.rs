use std::{fmt, io};

/// Crate-wide `Result` type using [`AssetError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Top-level error type for railassets operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum AssetError {
    /// Filter/sort/page parameter errors raised by callers.
    Query(QueryError),

    /// Export encoding or delivery errors.
    Export(ExportError),

    /// Persistence boundary errors.
    Store(StoreError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Errors raised while building a query from caller input.
///
/// Record contents never produce these: malformed fields only make a
/// clause fail to match.
#[derive(Debug)]
pub enum QueryError {
    /// A filter clause name that the filter state does not define.
    UnknownClause(String),

    /// A `NAME=VALUE` filter argument without the `=` separator.
    MalformedFilter(String),

    /// Page size must be positive.
    InvalidPageSize,

    /// Pages are numbered from 1.
    InvalidPage,
}

/// Export-specific errors.
#[derive(Debug)]
pub enum ExportError {
    /// A row does not have one cell per header.
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The model does not fit the target format.
    TooLarge(String),

    /// The encoder failed to build the artifact.
    EncodeFailed { format: String, message: String },

    /// The document rendering backend could not be loaded.
    BackendLoad(String),

    /// The artifact could not be delivered.
    DeliveryFailed { filename: String, message: String },
}

/// Persistence boundary errors.
#[derive(Debug)]
pub enum StoreError {
    /// No record with the given id.
    NotFound(String),

    /// Reading the collection failed.
    FetchFailed(String),

    /// The collection payload could not be decoded.
    DecodeFailed(String),

    /// Writing the collection failed.
    WriteFailed(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Query(e) => write!(f, "Query error: {e}"),
            AssetError::Export(e) => write!(f, "Export error: {e}"),
            AssetError::Store(e) => write!(f, "Store error: {e}"),
            AssetError::Config(e) => write!(f, "Configuration error: {e}"),
            AssetError::Io(e) => write!(f, "I/O error: {e}"),
            AssetError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownClause(name) => write!(f, "Unknown filter: {name}"),
            QueryError::MalformedFilter(arg) => {
                write!(f, "Expected NAME=VALUE, found '{arg}'")
            }
            QueryError::InvalidPageSize => write!(f, "Page size must be greater than zero"),
            QueryError::InvalidPage => write!(f, "Page numbers start at 1"),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::RowWidth {
                row,
                expected,
                found,
            } => write!(f, "Row {row} has {found} cells, expected {expected}"),
            ExportError::TooLarge(msg) => write!(f, "Model too large: {msg}"),
            ExportError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode {format}: {message}")
            }
            ExportError::BackendLoad(msg) => {
                write!(f, "Failed to load document backend: {msg}")
            }
            ExportError::DeliveryFailed { filename, message } => {
                write!(f, "Failed to deliver {filename}: {message}")
            }
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Record not found: {id}"),
            StoreError::FetchFailed(msg) => write!(f, "Failed to fetch records: {msg}"),
            StoreError::DecodeFailed(msg) => write!(f, "Failed to decode records: {msg}"),
            StoreError::WriteFailed(msg) => write!(f, "Failed to write records: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for QueryError {}
impl std::error::Error for ExportError {}
impl std::error::Error for StoreError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to AssetError ========================= */

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<QueryError> for AssetError {
    fn from(err: QueryError) -> Self {
        AssetError::Query(err)
    }
}

impl From<ExportError> for AssetError {
    fn from(err: ExportError) -> Self {
        AssetError::Export(err)
    }
}

impl From<StoreError> for AssetError {
    fn from(err: StoreError) -> Self {
        AssetError::Store(err)
    }
}

impl From<ConfigError> for AssetError {
    fn from(err: ConfigError) -> Self {
        AssetError::Config(err)
    }
}

impl From<String> for AssetError {
    fn from(msg: String) -> Self {
        AssetError::Generic(msg)
    }
}

impl From<&str> for AssetError {
    fn from(msg: &str) -> Self {
        AssetError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_width_message() {
        let err: AssetError = ExportError::RowWidth {
            row: 3,
            expected: 5,
            found: 4,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Export error: Row 3 has 4 cells, expected 5"
        );
    }

    #[test]
    fn test_unknown_clause_message() {
        let err = AssetError::from(QueryError::UnknownClause("cor".to_string()));
        assert_eq!(err.to_string(), "Query error: Unknown filter: cor");
    }

    #[test]
    fn test_generic_from_str() {
        let err = AssetError::from("boom");
        assert!(matches!(err, AssetError::Generic(ref m) if m == "boom"));
    }
}
