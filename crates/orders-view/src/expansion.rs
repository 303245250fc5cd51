//! Expanded/collapsed flags of grid nodes.
//!
//! Kept apart from the [`ViewResult`](orders_model::ViewResult): nodes are
//! identified by [`NodeId`], so a flag survives recomputation as long as the
//! record or group path still appears in the new result.

use std::collections::HashMap;

use orders_model::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    overrides: HashMap<NodeId, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups start expanded, records start collapsed.
    pub fn default_for(node: &NodeId) -> bool {
        matches!(node, NodeId::Group(_))
    }

    pub fn is_expanded(&self, node: &NodeId) -> bool {
        self.overrides
            .get(node)
            .copied()
            .unwrap_or_else(|| Self::default_for(node))
    }

    /// Flip the flag of `node`, returning the new value.
    pub fn toggle(&mut self, node: NodeId) -> bool {
        let expanded = !self.is_expanded(&node);
        self.set(node, expanded);
        expanded
    }

    pub fn set(&mut self, node: NodeId, expanded: bool) {
        if expanded == Self::default_for(&node) {
            self.overrides.remove(&node);
        } else {
            self.overrides.insert(node, expanded);
        }
    }

    /// Nodes whose flag differs from the default.
    pub fn overrides(&self) -> impl Iterator<Item = (&NodeId, bool)> {
        self.overrides.iter().map(|(node, expanded)| (node, *expanded))
    }
}

#[cfg(test)]
mod tests {
    use orders_model::{FieldValue, GroupPath, RecordId};

    use super::*;

    #[test]
    fn defaults_and_toggle() {
        let mut state = ExpansionState::new();
        let record = NodeId::Record(RecordId(10248));
        let group = NodeId::Group(GroupPath::default().child("customerID", &FieldValue::text("VINET")));

        assert!(!state.is_expanded(&record));
        assert!(state.is_expanded(&group));

        assert!(state.toggle(record.clone()));
        assert!(!state.toggle(group.clone()));
        assert_eq!(state.overrides().count(), 2);

        assert!(!state.toggle(record.clone()));
        assert!(!state.is_expanded(&record));
        assert_eq!(state.overrides().count(), 1);
    }
}
