//! Cell text for exported and printed grids.

use orders_ingest::{DateStyle, LocaleContext};
use orders_model::{ColumnSpec, DisplayFormat, FieldValue};

/// Render `value` the way the grid column shows it in `locale`.
pub fn format_cell(value: &FieldValue, column: &ColumnSpec, locale: &LocaleContext) -> String {
    match (value, column.format) {
        (FieldValue::Missing, _) => String::new(),
        (FieldValue::DateTime(value), DisplayFormat::LongDate) => {
            locale.format_date(*value, DateStyle::Long)
        }
        (FieldValue::DateTime(value), DisplayFormat::ShortDate) => {
            locale.format_date(*value, DateStyle::Short)
        }
        (FieldValue::Number(value), DisplayFormat::Decimal(decimals)) => {
            locale.format_number(*value, usize::from(decimals))
        }
        (FieldValue::Number(_), _) => {
            let separator = locale.decimal_separator();
            value.to_string().replace('.', &separator.to_string())
        }
        (value, _) => value.to_string(),
    }
}

/// Locale-independent cell text, used for spreadsheet files.
pub fn raw_cell(value: &FieldValue) -> String {
    match value {
        FieldValue::DateTime(value) => value.format("%Y-%m-%dT%H:%M:%S").to_string(),
        value => value.to_string(),
    }
}
