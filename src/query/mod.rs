//! In-memory query pipeline
//!
//! Every user interaction re-derives its view from the fetched snapshot:
//!
//! ```text
//! records ──filter──▶ matches ──sort──▶ ordered ──paginate──▶ current page
//!                                         │
//!                                         └──▶ export (all ordered matches)
//! ```
//!
//! Each stage is a pure function over borrowed input returning a fresh
//! sequence, so a caller can keep re-filtering from a previous result.

pub mod filter;
pub mod paginate;
pub mod sort;

pub use filter::{
    Bound, CategoricalClause, Clause, DateRangeClause, FilterState, NamedClause,
    NumericRangeClause, TextClause, active_filters_count, apply_filters,
};
pub use paginate::{Page, paginate_data, total_pages};
pub use sort::{SortDirection, SortSpec, compare_values, sort_data};

use crate::record::Record;

/// Filter, optional sort and page for one view of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filters: FilterState,
    pub sort: Option<SortSpec>,
    pub page: Page,
}

/// Outcome of running a [`Query`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Records on the requested page
    pub items: Vec<Record>,
    /// All matching records in sort order (what an export consumes)
    pub ordered: Vec<Record>,
    /// Requested page
    pub page: Page,
    /// Page count for the matching records
    pub total_pages: usize,
    /// Number of active filter clauses
    pub active_filters: usize,
}

impl QueryResult {
    /// Number of records matching the filters
    pub fn total_matches(&self) -> usize {
        self.ordered.len()
    }
}

impl Query {
    /// Unsorted query over the first page
    pub fn new(filters: FilterState, page_size: usize) -> Self {
        Self {
            filters,
            sort: None,
            page: Page::first(page_size),
        }
    }

    /// Set the sort order
    pub fn sorted_by(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Select a page
    pub fn on_page(mut self, index: usize) -> Self {
        self.page.index = index;
        self
    }

    /// Filter and sort without paginating
    pub fn ordered(&self, records: &[Record]) -> Vec<Record> {
        let filtered = apply_filters(records, &self.filters);
        match &self.sort {
            Some(spec) => spec.apply(&filtered),
            None => filtered,
        }
    }

    /// Run the full pipeline
    ///
    /// # Arguments
    /// * `records` - Collection snapshot
    ///
    /// # Returns
    /// * `QueryResult` - Current page plus the totals a list view needs
    pub fn run(&self, records: &[Record]) -> QueryResult {
        let ordered = self.ordered(records);
        QueryResult {
            items: self.page.apply(&ordered),
            total_pages: total_pages(ordered.len(), self.page.size),
            active_filters: active_filters_count(&self.filters),
            page: self.page,
            ordered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new().with("codigo", "A-1").with("estado", "Ativo"),
            Record::new().with("codigo", "A-2").with("estado", "Ativo"),
            Record::new().with("codigo", "B-1").with("estado", "Manutenção"),
        ]
    }

    fn filters() -> FilterState {
        FilterState::new().with_clause("estado", Clause::categorical("estado"))
    }

    #[test]
    fn test_round_trip_scenario() {
        let mut f = filters();
        f.set("estado", "Ativo").unwrap();
        let query = Query::new(f, 1).sorted_by(SortSpec::desc("codigo"));

        let first = query.run(&records());
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.total_matches(), 2);
        assert_eq!(first.active_filters, 1);
        assert_eq!(first.items.len(), 1);
        assert_eq!(first.items[0].text("codigo"), "A-2");

        let second = query.clone().on_page(2).run(&records());
        assert_eq!(second.items[0].text("codigo"), "A-1");

        assert!(query.on_page(3).run(&records()).items.is_empty());
    }

    #[test]
    fn test_unsorted_keeps_input_order() {
        let result = Query::new(filters(), 10).run(&records());
        let codes: Vec<String> = result.items.iter().map(|r| r.text("codigo")).collect();
        assert_eq!(codes, ["A-1", "A-2", "B-1"]);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn test_empty_collection() {
        let result = Query::new(filters(), 10).run(&[]);
        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 0);
    }
}
