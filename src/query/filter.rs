//! Filter predicate engine
//!
//! A [`FilterState`] is an ordered set of named clauses. Each clause kind
//! carries its own value and its own notion of "active": a clause whose
//! value is the empty string never constrains anything, which makes the
//! reset state of every filter form a plain default rather than a special
//! case.
//!
//! Clauses combine with AND; the free-text clause ORs over its field list.
//! Matching never fails: missing fields read as empty text, and a value
//! that cannot be read as a number or date makes that clause not match.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QueryError, Result};
use crate::record::{Record, parse_date, parse_number};

/// Which side of a range a bound clause constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    /// Keep records whose field is `>=` the clause value
    Lower,
    /// Keep records whose field is `<=` the clause value
    Upper,
}

/// Case-insensitive substring search over several fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextClause {
    pub term: String,
    pub fields: Vec<String>,
}

/// Exact match on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalClause {
    pub field: String,
    pub value: String,
}

/// One numeric bound on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRangeClause {
    pub field: String,
    pub bound: Bound,
    pub value: String,
}

/// One calendar bound on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeClause {
    pub field: String,
    pub bound: Bound,
    pub value: String,
}

/// A single filter constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Clause {
    Text(TextClause),
    Categorical(CategoricalClause),
    NumericRange(NumericRangeClause),
    DateRange(DateRangeClause),
}

impl Clause {
    /// Free-text clause over `fields`, initially empty
    pub fn text<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Clause::Text(TextClause {
            term: String::new(),
            fields: fields.into_iter().map(Into::into).collect(),
        })
    }

    /// Exact-match clause on `field`, initially empty
    pub fn categorical(field: impl Into<String>) -> Self {
        Clause::Categorical(CategoricalClause {
            field: field.into(),
            value: String::new(),
        })
    }

    /// Numeric bound clause on `field`, initially empty
    pub fn numeric(field: impl Into<String>, bound: Bound) -> Self {
        Clause::NumericRange(NumericRangeClause {
            field: field.into(),
            bound,
            value: String::new(),
        })
    }

    /// Date bound clause on `field`, initially empty
    pub fn date(field: impl Into<String>, bound: Bound) -> Self {
        Clause::DateRange(DateRangeClause {
            field: field.into(),
            bound,
            value: String::new(),
        })
    }

    /// Current clause value
    pub fn value(&self) -> &str {
        match self {
            Clause::Text(c) => &c.term,
            Clause::Categorical(c) => &c.value,
            Clause::NumericRange(c) => &c.value,
            Clause::DateRange(c) => &c.value,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self {
            Clause::Text(c) => &mut c.term,
            Clause::Categorical(c) => &mut c.value,
            Clause::NumericRange(c) => &mut c.value,
            Clause::DateRange(c) => &mut c.value,
        }
    }

    /// Replace the clause value
    pub fn set_value(&mut self, value: impl Into<String>) {
        *self.value_mut() = value.into();
    }

    /// Builder-style [`Clause::set_value`]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Return the clause to its "no constraint" state
    pub fn clear(&mut self) {
        self.value_mut().clear();
    }

    /// Whether the clause constrains anything
    pub fn is_active(&self) -> bool {
        !self.value().is_empty()
    }

    /// Evaluate the clause against one record
    ///
    /// Inactive clauses always match.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.is_active() {
            return true;
        }

        match self {
            Clause::Text(c) => {
                let term = c.term.to_lowercase();
                c.fields
                    .iter()
                    .any(|field| record.text(field).to_lowercase().contains(&term))
            }
            // Strict equality: only a string field can equal the clause value.
            Clause::Categorical(c) => record
                .get(&c.field)
                .and_then(|v| v.as_str())
                .is_some_and(|v| v == c.value),
            Clause::NumericRange(c) => match (record.number(&c.field), parse_number(&c.value)) {
                (Some(actual), Some(bound)) => within(actual, bound, c.bound),
                _ => false,
            },
            Clause::DateRange(c) => match (record.date(&c.field), parse_date(&c.value)) {
                (Some(actual), Some(bound)) => within(actual, bound, c.bound),
                _ => false,
            },
        }
    }
}

fn within<T: PartialOrd>(actual: T, limit: T, bound: Bound) -> bool {
    match bound {
        Bound::Lower => actual >= limit,
        Bound::Upper => actual <= limit,
    }
}

/// A clause together with the name the UI knows it by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedClause {
    pub name: String,
    pub clause: Clause,
}

/// Current filter selection for one collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    clauses: Vec<NamedClause>,
}

impl FilterState {
    /// Create a filter state with no clauses
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named clause (builder style)
    ///
    /// A clause with an existing name replaces the previous one in place.
    pub fn with_clause(mut self, name: impl Into<String>, clause: Clause) -> Self {
        let name = name.into();
        match self.clauses.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.clause = clause,
            None => self.clauses.push(NamedClause { name, clause }),
        }
        self
    }

    /// Look up a clause by name
    pub fn get(&self, name: &str) -> Option<&Clause> {
        self.clauses
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.clause)
    }

    /// Set the value of a named clause
    ///
    /// # Arguments
    /// * `name` - Clause name, e.g. `estado`
    /// * `value` - New value; the empty string deactivates the clause
    ///
    /// # Returns
    /// * `Result<()>` - Error when the state has no clause with that name
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let entry = self
            .clauses
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| QueryError::UnknownClause(name.to_string()))?;
        entry.clause.set_value(value);
        Ok(())
    }

    /// Deactivate every clause
    pub fn reset(&mut self) {
        for entry in &mut self.clauses {
            entry.clause.clear();
        }
    }

    /// Iterate over all clauses in declaration order
    pub fn clauses(&self) -> impl Iterator<Item = &NamedClause> {
        self.clauses.iter()
    }

    /// Iterate over the clauses that currently constrain records
    pub fn active_clauses(&self) -> impl Iterator<Item = &NamedClause> {
        self.clauses.iter().filter(|c| c.clause.is_active())
    }

    /// Whether a record satisfies every active clause
    pub fn matches(&self, record: &Record) -> bool {
        self.active_clauses().all(|c| c.clause.matches(record))
    }
}

/// Keep the records satisfying every active clause, in input order
///
/// # Arguments
/// * `records` - Collection snapshot
/// * `state` - Current filter selection
///
/// # Returns
/// * `Vec<Record>` - Matching records, relative order preserved
pub fn apply_filters(records: &[Record], state: &FilterState) -> Vec<Record> {
    let filtered: Vec<Record> = records
        .iter()
        .filter(|record| state.matches(record))
        .cloned()
        .collect();

    debug!(
        "Filtered {} of {} records ({} active filters)",
        filtered.len(),
        records.len(),
        active_filters_count(state)
    );
    filtered
}

/// Number of clauses differing from their "no constraint" default
pub fn active_filters_count(state: &FilterState) -> usize {
    state.active_clauses().count()
}
