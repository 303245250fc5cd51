//! The materialized projection of a record store.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::descriptor::AggregateKind;
use crate::schema::{Record, RecordId};
use crate::value::FieldValue;

/// Aggregate values of one group: field name -> aggregate kind -> value.
pub type AggregateValues = BTreeMap<String, BTreeMap<AggregateKind, FieldValue>>;

#[derive(Debug, Clone, PartialEq)]
pub enum GroupItems<R> {
    Records(Vec<Arc<R>>),
    Groups(Vec<GroupNode<R>>),
}

/// One partition of a grouping level.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode<R> {
    pub field: String,
    pub value: FieldValue,
    /// Leaf records below this node, across all nested levels.
    pub count: usize,
    pub aggregates: AggregateValues,
    pub items: GroupItems<R>,
}

impl<R> GroupNode<R> {
    pub fn aggregate(&self, field: &str, kind: AggregateKind) -> Option<&FieldValue> {
        self.aggregates.get(field).and_then(|values| values.get(&kind))
    }

    /// Leaf records in display order.
    pub fn records(&self) -> Vec<&Arc<R>> {
        let mut out = Vec::with_capacity(self.count);
        self.collect_records(&mut out);
        out
    }

    fn collect_records<'a>(&'a self, out: &mut Vec<&'a Arc<R>>) {
        match &self.items {
            GroupItems::Records(records) => out.extend(records.iter()),
            GroupItems::Groups(groups) => {
                for group in groups {
                    group.collect_records(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewData<R> {
    Flat(Vec<Arc<R>>),
    Grouped(Vec<GroupNode<R>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult<R> {
    pub data: ViewData<R>,
    /// Top-level items (records, or groups when grouped) before paging.
    pub total: usize,
    /// Records that passed the filter.
    pub record_count: usize,
}

impl<R> ViewResult<R> {
    /// Number of top-level items on the current page.
    pub fn len(&self) -> usize {
        match &self.data {
            ViewData::Flat(records) => records.len(),
            ViewData::Grouped(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn groups(&self) -> &[GroupNode<R>] {
        match &self.data {
            ViewData::Grouped(groups) => groups,
            ViewData::Flat(_) => &[],
        }
    }

    /// Leaf records on the current page, in display order.
    pub fn records(&self) -> Vec<&Arc<R>> {
        match &self.data {
            ViewData::Flat(records) => records.iter().collect(),
            ViewData::Grouped(groups) => groups.iter().flat_map(GroupNode::records).collect(),
        }
    }
}

impl<R: Record> ViewResult<R> {
    pub fn record_ids(&self) -> Vec<RecordId> {
        self.records().into_iter().map(|record| record.id()).collect()
    }
}

/// Identity of a group: the (field, value) pairs from the top level down.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GroupPath(pub Vec<(String, FieldValue)>);

impl GroupPath {
    #[must_use]
    pub fn child(&self, field: &str, value: &FieldValue) -> Self {
        let mut path = self.0.clone();
        path.push((field.to_string(), value.clone()));
        Self(path)
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, (field, value)) in self.0.iter().enumerate() {
            if pos > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{field}={value}")?;
        }
        Ok(())
    }
}

/// A node of the grid that can be expanded or collapsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeId {
    Record(RecordId),
    Group(GroupPath),
}
