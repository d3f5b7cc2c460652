//! Schema-less asset records
//!
//! A [`Record`] is a JSON object as returned by the persistence layer. The
//! pipeline reads fields by name and never enforces a schema, so every
//! accessor here is total: a missing field, a `null`, or a value of the
//! wrong shape degrades to an empty text, `None` number or `None` date.
//!
//! Field names may address nested objects with a dotted path
//! (`parametros.tensao`). A key that literally contains a dot is looked up
//! first, so flat records are never misread.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field map backing a [`Record`]
pub type Fields = Map<String, Value>;

/// One domain entity (a rail segment, a signaling unit, a station, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Fields);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self(Fields::new())
    }

    /// Wrap an existing field map
    pub fn from_fields(fields: Fields) -> Self {
        Self(fields)
    }

    /// Builder-style field assignment
    ///
    /// # Arguments
    /// * `key` - Field name (stored verbatim, no path expansion)
    /// * `value` - Any value convertible to JSON
    ///
    /// # Returns
    /// * `Self` - The record with the field set
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set a top-level field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Borrow the underlying field map
    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Consume the record, returning its field map
    pub fn into_fields(self) -> Fields {
        self.0
    }

    /// The record identifier, if it has one
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::Null => None,
            other => Some(value_to_text(other)),
        }
    }

    /// Look up a field by name or dotted path
    ///
    /// # Arguments
    /// * `field` - Field name, e.g. `codigo` or `parametros.tensao`
    ///
    /// # Returns
    /// * `Option<&Value>` - The raw value, `None` when any path segment is missing
    pub fn get(&self, field: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(field) {
            return Some(value);
        }
        if !field.contains('.') {
            return None;
        }

        let mut segments = field.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Field as display text (`""` when missing or null)
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(value_to_text).unwrap_or_default()
    }

    /// Field as a number, when it holds one or a numeric string
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(value_to_number)
    }

    /// Field as a calendar instant, when it holds a parseable date
    pub fn date(&self, field: &str) -> Option<NaiveDateTime> {
        match self.get(field)? {
            Value::String(s) => parse_date(s),
            _ => None,
        }
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

/// Convert a JSON value to plain text
///
/// `null` becomes the empty string, strings are returned verbatim, numbers
/// drop a trailing `.0`, arrays are joined with `", "` and objects are
/// rendered as compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Convert a JSON value to a finite number
///
/// Accepts JSON numbers and strings holding a number (surrounding
/// whitespace ignored). Everything else, including the empty string, is
/// `None`.
pub fn value_to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_number(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Parse a textual number, `None` when blank or malformed
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a calendar date or date-time
///
/// Supported shapes: RFC 3339 (`2024-03-01T10:00:00Z`, offsets normalized to
/// UTC), naive ISO date-times with `T` or a space, ISO dates (`2024-03-01`,
/// read as midnight) and Brazilian day-first dates (`01/03/2024`).
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt);
        }
    }
    for pattern in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, pattern) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Render a number without a trailing `.0` for integral values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
