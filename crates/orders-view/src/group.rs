//! Group stage.
//!
//! Each level partitions its input by value equality of one field. A
//! partition is created by the first record that carries its value, so no
//! group is ever empty.

use std::collections::HashMap;
use std::sync::Arc;

use orders_model::{
    ConfigurationError, FieldSchema, FieldValue, GroupDescriptor, GroupItems, GroupNode, Record,
    SortDirection, ViewState,
};

use crate::aggregate::{self, AggregateSpec};
use crate::sort::compare_values;

#[derive(Debug, Clone)]
pub(crate) struct GroupLevel {
    field: &'static str,
    aggregates: Vec<AggregateSpec>,
    /// Set when the group field is also a sort key.
    order: Option<SortDirection>,
}

pub(crate) fn compile(
    groups: &[GroupDescriptor],
    state: &ViewState,
    schema: &FieldSchema,
) -> Result<Vec<GroupLevel>, ConfigurationError> {
    groups
        .iter()
        .map(|descriptor| {
            let def = schema.require(&descriptor.field)?;
            let aggregates = descriptor
                .aggregates
                .iter()
                .map(|aggregate| {
                    aggregate
                        .resolve(schema)
                        .map(|(field, kind)| (field.name, kind))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(GroupLevel {
                field: def.name,
                aggregates,
                order: state.sort_direction(def.name),
            })
        })
        .collect()
}

/// Partition `records` into the nested levels. `levels` must not be empty.
pub(crate) fn group_records<R: Record>(
    records: Vec<Arc<R>>,
    levels: &[GroupLevel],
) -> Vec<GroupNode<R>> {
    let Some((level, rest)) = levels.split_first() else {
        return Vec::new();
    };

    let mut partitions: Vec<(FieldValue, Vec<Arc<R>>)> = Vec::new();
    let mut index: HashMap<FieldValue, usize> = HashMap::new();
    for record in records {
        let key = record.value(level.field);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            partitions.push((key, Vec::new()));
            partitions.len() - 1
        });
        partitions[slot].1.push(record);
    }

    if let Some(dir) = level.order {
        partitions.sort_by(|(a, _), (b, _)| compare_values(a, b, dir));
    }

    partitions
        .into_iter()
        .map(|(value, records)| {
            let aggregates = aggregate::compute(&records, &level.aggregates);
            let count = records.len();
            let items = if rest.is_empty() {
                GroupItems::Records(records)
            } else {
                GroupItems::Groups(group_records(records, rest))
            };
            GroupNode {
                field: level.field.to_string(),
                value,
                count,
                aggregates,
                items,
            }
        })
        .collect()
}
