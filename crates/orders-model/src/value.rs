//! Typed field values as seen by the view pipeline.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    #[serde(alias = "date")]
    DateTime,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Ok(FieldType::Text),
            "number" | "numeric" => Ok(FieldType::Number),
            "datetime" | "date" => Ok(FieldType::DateTime),
            _ => Err(format!("Unknown field type: {s}")),
        }
    }
}

/// A single field value.
///
/// `Missing` stands for an absent or unparseable field. Values carry a total
/// order: `Missing` sorts first, then values are ranked by type and compared
/// natively within a type (numbers via `f64::total_cmp`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Missing,
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

const DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO 8601 style timestamp or calendar date.
///
/// A trailing `Z` is accepted and ignored; date-only values land on midnight.
pub fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    for pattern in DATETIME_PATTERNS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Text(_) => Some(FieldType::Text),
            FieldValue::Number(_) => Some(FieldType::Number),
            FieldValue::DateTime(_) => Some(FieldType::DateTime),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    /// Convert this value to `target`, if a lossless reading exists.
    ///
    /// Text is read as a number or timestamp; numbers become text. `Missing`
    /// coerces to `Missing` for every type.
    pub fn coerce_to(&self, target: FieldType) -> Option<FieldValue> {
        match (self, target) {
            (FieldValue::Missing, _) => Some(FieldValue::Missing),
            (value, target) if value.field_type() == Some(target) => Some(value.clone()),
            (FieldValue::Text(text), FieldType::Number) => {
                text.trim().parse::<f64>().ok().map(FieldValue::Number)
            }
            (FieldValue::Text(text), FieldType::DateTime) => {
                parse_iso_datetime(text).map(FieldValue::DateTime)
            }
            (FieldValue::Number(_), FieldType::Text) => Some(FieldValue::Text(self.to_string())),
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Missing => 0,
            FieldValue::Number(_) => 1,
            FieldValue::DateTime(_) => 2,
            FieldValue::Text(_) => 3,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        match self {
            FieldValue::Missing => {}
            FieldValue::Number(value) => value.to_bits().hash(state),
            FieldValue::DateTime(value) => value.hash(state),
            FieldValue::Text(value) => value.hash(state),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
            (FieldValue::Number(left), FieldValue::Number(right)) => left.total_cmp(right),
            (FieldValue::DateTime(left), FieldValue::DateTime(right)) => left.cmp(right),
            (FieldValue::Text(left), FieldValue::Text(right)) => left.cmp(right),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => Ok(()),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_orders_before_everything() {
        assert!(FieldValue::Missing < FieldValue::Number(-1e9));
        assert!(FieldValue::Missing < FieldValue::text(""));
    }

    #[test]
    fn coerces_text_to_typed_values() {
        assert_eq!(
            FieldValue::text("15.5").coerce_to(FieldType::Number),
            Some(FieldValue::Number(15.5))
        );
        let date = FieldValue::text("1996-07-04").coerce_to(FieldType::DateTime);
        assert_eq!(
            date.and_then(|v| v.as_datetime()).map(|d| d.to_string()),
            Some("1996-07-04 00:00:00".to_string())
        );
        assert_eq!(FieldValue::text("abc").coerce_to(FieldType::Number), None);
    }

    #[test]
    fn parses_iso_timestamps_with_zulu_suffix() {
        let parsed = parse_iso_datetime("1996-07-04T00:00:00.000Z").unwrap();
        assert_eq!(parsed.to_string(), "1996-07-04 00:00:00");
    }

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(FieldValue::Number(10248.0).to_string(), "10248");
        assert_eq!(FieldValue::Number(32.38).to_string(), "32.38");
    }
}
