//! Output formatting for listings
//!
//! Turns a [`QueryResult`] into terminal text: the current page projected
//! through the asset kind's export columns and rendered as a table,
//! followed by a one-line status.

pub mod table;

pub use table::{TableFormatter, TableStyle};

use crate::config::DisplayConfig;
use crate::domain::AssetKind;
use crate::query::QueryResult;

/// Listing formatter
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    table: TableFormatter,
}

impl Formatter {
    pub fn new(table: TableFormatter) -> Self {
        Self { table }
    }

    /// Build a formatter from display settings
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(
            TableFormatter::new()
                .with_style(config.table_style)
                .with_max_column_width(config.max_column_width),
        )
    }

    /// Render one page of a query result
    ///
    /// # Arguments
    /// * `kind` - Asset kind selecting the visible columns
    /// * `result` - Query result whose `items` are the current page
    ///
    /// # Returns
    /// * `String` - Table plus status line
    pub fn format_page(&self, kind: AssetKind, result: &QueryResult) -> String {
        let model = kind.format_for_export(&result.items);
        format!("{}\n{}", self.table.format(&model), format_status(result))
    }
}

/// Status line shown under a listing
///
/// An empty result still reads as page 1 of 1.
///
/// # Returns
/// * `String` - e.g. `page 1 of 3 (25 matching records, 2 active filters)`
pub fn format_status(result: &QueryResult) -> String {
    format!(
        "page {} of {} ({} matching record{}, {} active filter{})",
        result.page.index,
        result.total_pages.max(1),
        result.total_matches(),
        plural(result.total_matches()),
        result.active_filters,
        plural(result.active_filters)
    )
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
