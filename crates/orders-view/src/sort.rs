//! Sort stage.
//!
//! Keys are read once per record and the decorated rows are sorted with a
//! stable sort, so rows that tie on every key keep their input order.
//! Missing values come first in both directions.

use std::cmp::Ordering;
use std::sync::Arc;

use orders_model::{ConfigurationError, FieldSchema, FieldValue, Record, SortDescriptor, SortDirection};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SortKey {
    field: &'static str,
    dir: SortDirection,
}

pub(crate) fn compile(
    sort: &[SortDescriptor],
    schema: &FieldSchema,
) -> Result<Vec<SortKey>, ConfigurationError> {
    sort.iter()
        .map(|descriptor| {
            let def = schema.require(&descriptor.field)?;
            Ok(SortKey {
                field: def.name,
                dir: descriptor.dir,
            })
        })
        .collect()
}

pub(crate) fn sort_records<R: Record>(records: &mut Vec<Arc<R>>, keys: &[SortKey]) {
    if keys.is_empty() || records.len() < 2 {
        return;
    }
    let mut decorated: Vec<(Vec<FieldValue>, Arc<R>)> = records
        .drain(..)
        .map(|record| {
            let values = keys.iter().map(|key| record.value(key.field)).collect();
            (values, record)
        })
        .collect();
    decorated.sort_by(|(left, _), (right, _)| {
        keys.iter()
            .zip(left.iter().zip(right))
            .map(|(key, (a, b))| compare_values(a, b, key.dir))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    records.extend(decorated.into_iter().map(|(_, record)| record));
}

/// Order two values of one field under `dir`.
///
/// Missing sorts before every present value regardless of direction. Text
/// compares case-insensitively, falling back to a case-sensitive comparison
/// so the order stays total.
pub fn compare_values(a: &FieldValue, b: &FieldValue, dir: SortDirection) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => {
            let ordering = natural_order(a, b);
            match dir {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

fn natural_order(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Text(left), FieldValue::Text(right)) => left
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(right.chars().flat_map(char::to_lowercase))
            .then_with(|| left.cmp(right)),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_first_in_both_directions() {
        let missing = FieldValue::Missing;
        let present = FieldValue::Number(1.0);
        assert_eq!(compare_values(&missing, &present, SortDirection::Asc), Ordering::Less);
        assert_eq!(compare_values(&missing, &present, SortDirection::Desc), Ordering::Less);
    }

    #[test]
    fn text_ignores_case_first() {
        let lower = FieldValue::text("alfki");
        let upper = FieldValue::text("BONAP");
        assert_eq!(compare_values(&lower, &upper, SortDirection::Asc), Ordering::Less);
        let a = FieldValue::text("Vinet");
        let b = FieldValue::text("vinet");
        assert_eq!(compare_values(&a, &b, SortDirection::Asc), Ordering::Less);
    }
}
