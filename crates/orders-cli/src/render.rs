//! Terminal and JSON rendering of the grid.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use orders_export::format_cell;
use orders_ingest::LocaleContext;
use orders_model::{
    AggregateValues, ColumnSpec, FieldType, FieldValue, Order, Record, display_columns,
    find_column, order_columns,
};
use orders_view::{RenderRow, ViewStateController};

const INDENT: &str = "  ";

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// The grid as text: group header lines, record tables, detail blocks and
/// the pager line.
pub fn render_view(controller: &ViewStateController<Order>, locale: &LocaleContext) -> String {
    let columns = display_columns(order_columns());
    let mut out = String::new();
    let mut pending: Option<(usize, Table)> = None;

    for row in controller.render() {
        match row {
            RenderRow::GroupHeader {
                depth,
                group,
                expanded,
                ..
            } => {
                flush(&mut pending, &mut out);
                let title = find_column(&columns, &group.field).map_or(group.field.as_str(), |c| c.title);
                let value = group_value(&group.value, &group.field, locale);
                let count = locale.format_message("grid.groupCount", &[group.count.to_string().as_str()]);
                out.push_str(&INDENT.repeat(depth));
                out.push_str(&format!("{} {title}: {value} ({count})", marker(expanded)));
                let aggregates = aggregate_text(&group.aggregates, locale);
                if !aggregates.is_empty() {
                    out.push_str(&format!("  {aggregates}"));
                }
                out.push('\n');
            }
            RenderRow::Record {
                depth,
                record,
                expanded,
            } => {
                if pending.as_ref().is_some_and(|(pending_depth, _)| *pending_depth != depth) {
                    flush(&mut pending, &mut out);
                }
                let (_, table) = pending.get_or_insert_with(|| (depth, record_table(&columns)));
                let mut cells = vec![Cell::new(marker(expanded))];
                cells.extend(
                    columns
                        .iter()
                        .map(|column| Cell::new(format_cell(&record.value(column.field), column, locale))),
                );
                table.add_row(cells);
            }
            RenderRow::Detail { depth, record } => {
                flush(&mut pending, &mut out);
                for line in detail_lines(record, locale) {
                    out.push_str(&INDENT.repeat(depth + 1));
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
    }
    flush(&mut pending, &mut out);

    let result = controller.result();
    if result.record_count == 0 {
        out.push_str(locale.message("grid.noRecords"));
        out.push('\n');
    } else {
        let skip = controller.state().page.map_or(0, |page| page.skip);
        let shown = result.len();
        let (first, last) = if shown == 0 { (0, 0) } else { (skip + 1, skip + shown) };
        let (first, last, total) = (first.to_string(), last.to_string(), result.total.to_string());
        out.push_str(&locale.format_message(
            "grid.pagerInfo",
            &[first.as_str(), last.as_str(), total.as_str()],
        ));
        out.push('\n');
    }
    out
}

fn marker(expanded: bool) -> &'static str {
    if expanded { "▾" } else { "▸" }
}

fn record_table(columns: &[ColumnSpec]) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("")];
    header.extend(columns.iter().map(|column| header_cell(column.title)));
    table.set_header(header);
    apply_table_style(&mut table);
    for (index, column) in columns.iter().enumerate() {
        if column.field_type == FieldType::Number {
            align_column(&mut table, index + 1, CellAlignment::Right);
        }
    }
    table
}

fn flush(pending: &mut Option<(usize, Table)>, out: &mut String) {
    let Some((depth, table)) = pending.take() else {
        return;
    };
    for line in table.lines() {
        out.push_str(&INDENT.repeat(depth));
        out.push_str(&line);
        out.push('\n');
    }
}

fn group_value(value: &FieldValue, field: &str, locale: &LocaleContext) -> String {
    match find_column(order_columns(), field) {
        Some(column) => format_cell(value, column, locale),
        None => value.to_string(),
    }
}

fn aggregate_text(aggregates: &AggregateValues, locale: &LocaleContext) -> String {
    let mut parts = Vec::new();
    for (field, values) in aggregates {
        for (kind, value) in values {
            let text = match value {
                FieldValue::Number(number) if number.fract() != 0.0 => locale.format_number(*number, 2),
                other => group_value(other, field, locale),
            };
            parts.push(format!("{kind}({field}) = {text}"));
        }
    }
    parts.join(", ")
}

/// Ship address and line items of one order.
pub fn detail_lines(order: &Order, locale: &LocaleContext) -> Vec<String> {
    let address = &order.ship_address;
    let mut lines = vec![
        format!("{}: {}", locale.message("grid.detailStreet"), address.street),
        format!("{}: {}", locale.message("grid.detailCity"), address.city),
        format!("{}: {}", locale.message("grid.detailCountry"), address.country),
        format!("{}: {}", locale.message("grid.detailPostalCode"), address.postal_code),
    ];
    if order.details.is_empty() {
        return lines;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(locale.message("grid.detailProduct")),
        header_cell(locale.message("grid.detailUnitPrice")),
        header_cell(locale.message("grid.detailQuantity")),
        header_cell(locale.message("grid.detailDiscount")),
    ]);
    apply_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for detail in &order.details {
        table.add_row(vec![
            Cell::new(detail.product_id),
            Cell::new(locale.format_number(detail.unit_price, 2)),
            Cell::new(detail.quantity),
            Cell::new(format!("{}%", locale.format_number(detail.discount * 100.0, 0))),
        ]);
    }
    lines.extend(table.lines());
    lines.push(format!(
        "{}: {}",
        locale.message("grid.detailTotal"),
        locale.format_number(order.detail_total(), 2)
    ));
    lines
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JsonRow<'a> {
    #[serde(rename_all = "camelCase")]
    Group {
        depth: usize,
        path: String,
        field: &'a str,
        value: &'a FieldValue,
        count: usize,
        aggregates: &'a AggregateValues,
        expanded: bool,
    },
    #[serde(rename_all = "camelCase")]
    Record {
        depth: usize,
        expanded: bool,
        order: &'a Order,
    },
    #[serde(rename_all = "camelCase")]
    Detail { depth: usize, order_id: i64 },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonView<'a> {
    pub total: usize,
    pub record_count: usize,
    pub revision: u64,
    pub rows: Vec<JsonRow<'a>>,
}

pub fn json_view(controller: &ViewStateController<Order>) -> JsonView<'_> {
    let rows = controller
        .render()
        .into_iter()
        .map(|row| match row {
            RenderRow::GroupHeader {
                depth,
                path,
                group,
                expanded,
            } => JsonRow::Group {
                depth,
                path: path.to_string(),
                field: &group.field,
                value: &group.value,
                count: group.count,
                aggregates: &group.aggregates,
                expanded,
            },
            RenderRow::Record {
                depth,
                record,
                expanded,
            } => JsonRow::Record {
                depth,
                expanded,
                order: record.as_ref(),
            },
            RenderRow::Detail { depth, record } => JsonRow::Detail {
                depth,
                order_id: record.order_id,
            },
        })
        .collect();
    let result = controller.result();
    JsonView {
        total: result.total,
        record_count: result.record_count,
        revision: controller.revision(),
        rows,
    }
}
