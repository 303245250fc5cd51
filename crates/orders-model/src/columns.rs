//! Grid column layout shared by the terminal view and both exporters.

use crate::value::FieldType;

/// How a column value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// Field value as-is.
    Plain,
    /// `{0:d}`: numeric day, month and year.
    ShortDate,
    /// `{0:D}`: weekday and month names.
    LongDate,
    /// Fixed number of decimals with locale separators.
    Decimal(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: &'static str,
    pub title: &'static str,
    pub width: u16,
    pub field_type: FieldType,
    pub format: DisplayFormat,
    /// Locked columns stay at the left edge.
    pub locked: bool,
    pub filterable: bool,
}

impl ColumnSpec {
    const fn new(field: &'static str, width: u16, field_type: FieldType) -> Self {
        Self {
            field,
            title: field,
            width,
            field_type,
            format: DisplayFormat::Plain,
            locked: false,
            filterable: true,
        }
    }

    const fn formatted(mut self, format: DisplayFormat) -> Self {
        self.format = format;
        self
    }
}

const ORDER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("customerID", 200, FieldType::Text),
    ColumnSpec::new("orderDate", 300, FieldType::DateTime).formatted(DisplayFormat::LongDate),
    ColumnSpec::new("shipName", 280, FieldType::Text),
    ColumnSpec::new("freight", 200, FieldType::Number),
    ColumnSpec::new("shippedDate", 300, FieldType::DateTime).formatted(DisplayFormat::LongDate),
    ColumnSpec::new("employeeID", 200, FieldType::Number),
    ColumnSpec {
        title: "ID",
        locked: true,
        filterable: false,
        ..ColumnSpec::new("orderID", 90, FieldType::Number)
    },
];

/// Columns of the orders grid in declaration order.
pub fn order_columns() -> &'static [ColumnSpec] {
    ORDER_COLUMNS
}

/// Columns in render order: locked columns first, otherwise stable.
pub fn display_columns(columns: &[ColumnSpec]) -> Vec<ColumnSpec> {
    let mut ordered = columns.to_vec();
    ordered.sort_by_key(|column| !column.locked);
    ordered
}

pub fn find_column<'a>(columns: &'a [ColumnSpec], field: &str) -> Option<&'a ColumnSpec> {
    columns.iter().find(|column| column.field == field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_column_renders_first() {
        let ordered = display_columns(order_columns());
        assert_eq!(ordered[0].field, "orderID");
        assert_eq!(ordered[0].title, "ID");
        assert_eq!(ordered[1].field, "customerID");
    }
}
