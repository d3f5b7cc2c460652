//! Sort comparator
//!
//! Two numbers compare numerically; anything else compares as lower-cased
//! text with accents folded to their base letter first, so `É` sorts next
//! to `e` rather than after `z`. Missing and null values read as the empty
//! string and therefore come first in ascending order.
//!
//! A column mixing numbers and text still needs a total order, so values
//! rank as empty, then numbers, then text.
//!
//! Sorting is stable in both directions: records with equal keys keep the
//! relative order they had in the input.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::record::{Record, value_to_text};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Field and direction to order records by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Apply this spec to a collection
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        sort_data(records, &self.field, self.direction)
    }
}

/// Return a sorted copy of `records`; the input is left untouched
///
/// # Arguments
/// * `records` - Records to order
/// * `field` - Field name or dotted path to sort by
/// * `direction` - Ascending or descending
///
/// # Returns
/// * `Vec<Record>` - New, stably sorted sequence
pub fn sort_data(records: &[Record], field: &str, direction: SortDirection) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_values(a.get(field), b.get(field));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Compare two optional field values
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

#[derive(Debug, PartialEq)]
enum SortKey {
    Empty,
    Number(f64),
    /// Folded collation key, then the raw lower-cased text
    Text(String, String),
}

impl SortKey {
    fn of(value: Option<&Value>) -> Self {
        if let Some(n) = value.and_then(Value::as_f64) {
            // -0.0 and 0.0 are the same key
            return SortKey::Number(if n == 0.0 { 0.0 } else { n });
        }
        let text = value.map(value_to_text).unwrap_or_default().to_lowercase();
        if text.is_empty() {
            SortKey::Empty
        } else {
            SortKey::Text(collation_key(&text), text)
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Empty => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(..) => 2,
        }
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
            (SortKey::Text(kx, x), SortKey::Text(ky, y)) => kx.cmp(ky).then_with(|| x.cmp(y)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn collation_key(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(records: &[Record]) -> Vec<String> {
        records.iter().map(|r| r.text("codigo")).collect()
    }

    #[test]
    fn test_numeric_sort() {
        let records = vec![
            Record::new().with("codigo", "a").with("km", 10),
            Record::new().with("codigo", "b").with("km", 2),
            Record::new().with("codigo", "c").with("km", 2.5),
        ];
        assert_eq!(codes(&sort_data(&records, "km", SortDirection::Asc)), ["b", "c", "a"]);
        assert_eq!(codes(&sort_data(&records, "km", SortDirection::Desc)), ["a", "c", "b"]);
    }

    #[test]
    fn test_numeric_strings_sort_as_text() {
        let records = vec![
            Record::new().with("codigo", "10"),
            Record::new().with("codigo", "9"),
        ];
        assert_eq!(codes(&sort_data(&records, "codigo", SortDirection::Asc)), ["10", "9"]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let records = vec![
            Record::new().with("codigo", "beta"),
            Record::new().with("codigo", "Alpha"),
            Record::new().with("codigo", "gamma"),
        ];
        assert_eq!(
            codes(&sort_data(&records, "codigo", SortDirection::Asc)),
            ["Alpha", "beta", "gamma"]
        );
    }

    #[test]
    fn test_accents_sort_with_base_letter() {
        let records = vec![
            Record::new().with("codigo", "z"),
            Record::new().with("codigo", "Éster"),
            Record::new().with("codigo", "eixo"),
        ];
        assert_eq!(
            codes(&sort_data(&records, "codigo", SortDirection::Asc)),
            ["eixo", "Éster", "z"]
        );
    }

    #[test]
    fn test_missing_values_sort_first() {
        let records = vec![
            Record::new().with("codigo", "b").with("estado", "Ativo"),
            Record::new().with("codigo", "a"),
            Record::new().with("codigo", "c").with("estado", Value::Null),
        ];
        assert_eq!(
            codes(&sort_data(&records, "estado", SortDirection::Asc)),
            ["a", "c", "b"]
        );
    }

    #[test]
    fn test_stable_in_both_directions() {
        let records = vec![
            Record::new().with("codigo", "1").with("estado", "Ativo"),
            Record::new().with("codigo", "2").with("estado", "Inativo"),
            Record::new().with("codigo", "3").with("estado", "Ativo"),
            Record::new().with("codigo", "4").with("estado", "Inativo"),
        ];
        assert_eq!(
            codes(&sort_data(&records, "estado", SortDirection::Asc)),
            ["1", "3", "2", "4"]
        );
        assert_eq!(
            codes(&sort_data(&records, "estado", SortDirection::Desc)),
            ["2", "4", "1", "3"]
        );
    }

    #[test]
    fn test_input_untouched() {
        let records = vec![
            Record::new().with("codigo", "b"),
            Record::new().with("codigo", "a"),
        ];
        let before = records.clone();
        let _ = sort_data(&records, "codigo", SortDirection::Asc);
        assert_eq!(records, before);
    }

    #[test]
    fn test_mixed_column_is_total() {
        let records = vec![
            Record::new().with("codigo", "text").with("km", "5"),
            Record::new().with("codigo", "ten").with("km", 10),
            Record::new().with("codigo", "empty"),
            Record::new().with("codigo", "nine").with("km", 9),
        ];
        assert_eq!(
            codes(&sort_data(&records, "km", SortDirection::Asc)),
            ["empty", "nine", "ten", "text"]
        );
    }

    #[test]
    fn test_signed_zeros_are_equal_keys() {
        let records = vec![
            Record::new().with("codigo", "zero").with("km", 0),
            Record::new().with("codigo", "negative-zero").with("km", -0.0),
        ];
        assert_eq!(
            compare_values(records[0].get("km"), records[1].get("km")),
            Ordering::Equal
        );
        assert_eq!(
            codes(&sort_data(&records, "km", SortDirection::Asc)),
            ["zero", "negative-zero"]
        );
        assert_eq!(
            codes(&sort_data(&records, "km", SortDirection::Desc)),
            ["zero", "negative-zero"]
        );
    }
}
