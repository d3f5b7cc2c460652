//! Property-based tests for the query pipeline and export model.
//! Invariants must hold for arbitrary record shapes, not just fixtures.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::{Value, json};

use railassets::domain::AssetKind;
use railassets::export::{CsvEncoder, ExportCoordinator, ExportFormat, MemorySink};
use railassets::query::{
    SortDirection, active_filters_count, apply_filters, compare_values, paginate_data, sort_data,
    total_pages,
};
use railassets::record::Record;

/// Field values of any shape a loosely typed store might return.
fn field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        (-1000.0f64..1000.0).prop_map(|n| json!(n)),
        "[a-zA-Zé0-9 -]{0,8}".prop_map(Value::String),
        prop_oneof![Just("2021-03-04"), Just("04/03/2021"), Just("ontem")]
            .prop_map(|s| Value::String(s.to_string())),
    ]
}

const FIELDS: &[&str] = &[
    "codigo",
    "tipo",
    "estado",
    "fabricante",
    "material",
    "km_inicial",
    "km_final",
    "data_instalacao",
];

fn record() -> impl Strategy<Value = Record> {
    proptest::collection::vec(proptest::option::of(field_value()), FIELDS.len()).prop_map(
        |values| {
            let mut record = Record::new();
            for (field, value) in FIELDS.iter().zip(values) {
                if let Some(value) = value {
                    record.insert(*field, value);
                }
            }
            record
        },
    )
}

fn records() -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(record(), 0..30)
}

/// A clause name from the track filter form and a value to set it to.
fn clause_setting() -> impl Strategy<Value = (&'static str, String)> {
    let names = prop_oneof![
        Just("search"),
        Just("tipo"),
        Just("estado"),
        Just("fabricante"),
        Just("material"),
        Just("km_inicial"),
        Just("km_final"),
        Just("data_inicio"),
        Just("data_fim"),
    ];
    let values = prop_oneof![
        Just(String::new()),
        "[a-z0-9-]{1,3}",
        (-100i64..100).prop_map(|n| n.to_string()),
        Just("2020-01-01".to_string()),
    ];
    (names, values)
}

fn is_subsequence(sub: &[Record], full: &[Record]) -> bool {
    let mut rest = full.iter();
    sub.iter().all(|item| rest.any(|candidate| candidate == item))
}

fn raw(record: &Record) -> Value {
    serde_json::to_value(record).unwrap()
}

/// How a field reads in listings: null and missing are empty, integral
/// floats lose their `.0`.
fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => {
                let f = n.as_f64().unwrap();
                if f.fract() == 0.0 { format!("{}", f as i64) } else { format!("{f}") }
            }
        },
        Some(other) => other.to_string(),
    }
}

fn number_text(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn number_field(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => number_text(s),
        _ => None,
    }
}

fn date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

fn date_field(value: Option<&Value>) -> Option<NaiveDate> {
    value?.as_str().and_then(date_text)
}

fn at_least<T: PartialOrd>(a: Option<T>, b: Option<T>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a >= b)
}

/// Whether the track filter clause `name` set to `value` accepts `record`,
/// read straight from the JSON fields.
fn expected_match(record: &Value, name: &str, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let field = |f: &str| record.get(f);
    match name {
        "search" => {
            let term = value.to_lowercase();
            ["codigo", "fabricante", "tipo", "estado", "material"]
                .iter()
                .any(|f| display_text(field(f)).to_lowercase().contains(&term))
        }
        "tipo" | "estado" | "fabricante" | "material" => {
            field(name).and_then(Value::as_str) == Some(value)
        }
        "km_inicial" => at_least(number_field(field("km_inicial")), number_text(value)),
        "km_final" => at_least(number_text(value), number_field(field("km_final"))),
        "data_inicio" => at_least(date_field(field("data_instalacao")), date_text(value)),
        "data_fim" => at_least(date_text(value), date_field(field("data_instalacao"))),
        other => panic!("no track clause named {other}"),
    }
}

proptest! {
    /// Filtering with the reset state is the identity.
    #[test]
    fn default_filters_keep_everything(input in records()) {
        for kind in AssetKind::ALL {
            prop_assert_eq!(&apply_filters(&input, &kind.default_filters()), &input);
        }
    }

    /// Each clause kind alone keeps exactly the records its own reading of
    /// the raw field accepts.
    #[test]
    fn single_clause_is_sound(input in records(), (name, value) in clause_setting()) {
        let mut filters = AssetKind::Track.default_filters();
        filters.set(name, value.clone()).unwrap();

        let kept = apply_filters(&input, &filters);
        let expected: Vec<Record> = input
            .iter()
            .filter(|r| expected_match(&raw(r), name, &value))
            .cloned()
            .collect();
        prop_assert_eq!(&kept, &expected);
    }

    /// Combined clauses keep exactly the records every clause accepts, in
    /// input order.
    #[test]
    fn combined_clauses_are_sound(
        input in records(),
        settings in proptest::collection::vec(clause_setting(), 0..5),
    ) {
        let mut filters = AssetKind::Track.default_filters();
        let mut last = BTreeMap::new();
        for (name, value) in &settings {
            filters.set(name, value.clone()).unwrap();
            last.insert(*name, value.clone());
        }

        let kept = apply_filters(&input, &filters);
        let expected: Vec<Record> = input
            .iter()
            .filter(|r| {
                let value = raw(r);
                last.iter().all(|(name, v)| expected_match(&value, name, v))
            })
            .cloned()
            .collect();
        prop_assert_eq!(&kept, &expected);
        prop_assert!(is_subsequence(&kept, &input));
    }

    /// The badge count equals the number of non-empty clause values.
    #[test]
    fn active_count_matches_non_default_clauses(
        settings in proptest::collection::vec(clause_setting(), 0..8),
    ) {
        let mut filters = AssetKind::Track.default_filters();
        for (name, value) in &settings {
            filters.set(name, value.clone()).unwrap();
        }
        let non_default = filters
            .clauses()
            .filter(|c| !c.clause.value().is_empty())
            .count();
        prop_assert_eq!(active_filters_count(&filters), non_default);
        prop_assert_eq!(active_filters_count(&filters), filters.active_clauses().count());
    }

    /// Sorting is total, length-preserving and stable in both directions.
    #[test]
    fn sort_is_stable(
        input in records(),
        field in proptest::sample::select(FIELDS),
        desc in any::<bool>(),
    ) {
        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };

        // Tag each record with its input position so equal keys can be told apart.
        let tagged: Vec<Record> = input
            .iter()
            .enumerate()
            .map(|(i, r)| r.clone().with("__pos", i as u64))
            .collect();
        let sorted = sort_data(&tagged, field, direction);
        prop_assert_eq!(sorted.len(), tagged.len());

        for pair in sorted.windows(2) {
            let same_key = compare_values(pair[0].get(field), pair[1].get(field))
                == std::cmp::Ordering::Equal;
            if same_key {
                let a = pair[0].number("__pos").unwrap();
                let b = pair[1].number("__pos").unwrap();
                prop_assert!(a < b, "equal keys reordered: {} before {}", a, b);
            }
        }
    }

    /// Concatenated pages reproduce the input; no page exceeds the size.
    #[test]
    fn pages_cover_input(
        input in proptest::collection::vec(any::<u16>(), 0..60),
        size in 1usize..12,
    ) {
        let pages = total_pages(input.len(), size);
        let mut joined = Vec::new();
        for p in 1..=pages {
            let page = paginate_data(&input, p, size);
            prop_assert!(page.len() <= size);
            prop_assert!(!page.is_empty());
            joined.extend(page);
        }
        prop_assert_eq!(joined, input.clone());
        prop_assert!(paginate_data(&input, pages + 1, size).is_empty());
    }

    /// Every projection row has one cell per header.
    #[test]
    fn projection_rows_align(input in records()) {
        for kind in AssetKind::ALL {
            let model = kind.format_for_export(&input);
            prop_assert_eq!(model.rows.len(), input.len());
            prop_assert!(model.rows.iter().all(|row| row.len() == model.headers.len()));
        }
    }

    /// CSV output has one line per row plus the header and title block.
    #[test]
    fn csv_line_count(input in records()) {
        let model = AssetKind::Track.format_for_export(&input);
        let text = CsvEncoder::new().encode_to_string(&model).unwrap();
        // Generated values contain no newlines, so lines map to rows.
        prop_assert_eq!(text.lines().count(), input.len() + 3);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Every encoder accepts every projected model.
    #[test]
    fn encoders_accept_any_projection(input in proptest::collection::vec(record(), 0..8)) {
        let sink = std::sync::Arc::new(MemorySink::new());
        let coordinator = ExportCoordinator::new(sink.clone());
        let model = AssetKind::Structure.format_for_export(&input);

        for format in [
            ExportFormat::Spreadsheet,
            ExportFormat::DelimitedText,
            ExportFormat::Document,
        ] {
            let result = tokio_test::block_on(coordinator.export(&model, format, "obras_arte"));
            prop_assert!(result.is_ok(), "{:?} failed: {:?}", format, result.err());
        }
        prop_assert_eq!(sink.delivered().len(), 3);
    }
}
