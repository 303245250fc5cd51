//! Per-group aggregate computation.

use std::sync::Arc;

use orders_model::{AggregateKind, AggregateValues, FieldValue, Record};

/// A resolved aggregate request: schema field name and kind.
pub(crate) type AggregateSpec = (&'static str, AggregateKind);

/// Compute every requested aggregate over `records`.
///
/// Missing values are skipped. `sum` over no numbers is zero; `average`,
/// `min` and `max` over no values are missing.
pub(crate) fn compute<R: Record>(records: &[Arc<R>], specs: &[AggregateSpec]) -> AggregateValues {
    let mut out = AggregateValues::new();
    for &(field, kind) in specs {
        let value = match kind {
            AggregateKind::Count => FieldValue::Number(records.len() as f64),
            AggregateKind::Sum => FieldValue::Number(numbers(records, field).sum()),
            AggregateKind::Average => {
                let (sum, count) = numbers(records, field)
                    .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
                if count == 0 {
                    FieldValue::Missing
                } else {
                    FieldValue::Number(sum / count as f64)
                }
            }
            AggregateKind::Min => present(records, field).min().unwrap_or_default(),
            AggregateKind::Max => present(records, field).max().unwrap_or_default(),
        };
        out.entry(field.to_string()).or_default().insert(kind, value);
    }
    out
}

fn present<'a, R: Record>(
    records: &'a [Arc<R>],
    field: &'a str,
) -> impl Iterator<Item = FieldValue> + 'a {
    records
        .iter()
        .map(move |record| record.value(field))
        .filter(|value| !value.is_missing())
}

fn numbers<'a, R: Record>(records: &'a [Arc<R>], field: &'a str) -> impl Iterator<Item = f64> + 'a {
    present(records, field).filter_map(|value| value.as_number())
}
