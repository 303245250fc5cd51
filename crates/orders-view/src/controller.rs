//! The view-state controller.
//!
//! Owns the current [`ViewState`], the last [`ViewResult`] and the
//! [`ExpansionState`] of one grid. Events are applied one at a time; every
//! applied event bumps the revision and is published to listeners.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use orders_model::{
    ConfigurationError, GroupItems, GroupNode, GroupPath, NodeId, Record, RecordStore, ViewData,
    ViewResult, ViewState,
};

use crate::expansion::ExpansionState;
use crate::processor::materialize;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// New filter, sort, group or page descriptors.
    StateChanged(ViewState),
    ExpandToggled(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReason {
    Recomputed,
    ExpansionChanged,
}

/// What listeners see after each applied event.
#[derive(Debug)]
pub struct Publication<'a, R> {
    pub revision: u64,
    pub reason: PublishReason,
    pub result: &'a ViewResult<R>,
    pub expansion: &'a ExpansionState,
}

type Listener<R> = Box<dyn FnMut(&Publication<'_, R>)>;

/// One display row of the merged result and expansion state.
#[derive(Debug)]
pub enum RenderRow<'a, R> {
    GroupHeader {
        depth: usize,
        path: GroupPath,
        group: &'a GroupNode<R>,
        expanded: bool,
    },
    Record {
        depth: usize,
        record: &'a Arc<R>,
        expanded: bool,
    },
    /// Detail content of an expanded record.
    Detail { depth: usize, record: &'a Arc<R> },
}

pub struct ViewStateController<R> {
    store: RecordStore<R>,
    state: ViewState,
    result: ViewResult<R>,
    expansion: ExpansionState,
    revision: u64,
    listeners: Vec<Listener<R>>,
}

impl<R: fmt::Debug> fmt::Debug for ViewStateController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStateController")
            .field("records", &self.store.len())
            .field("state", &self.state)
            .field("total", &self.result.total)
            .field("expansion", &self.expansion)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<R: Record> ViewStateController<R> {
    /// Materialize the initial view. Fails if `state` does not fit the schema.
    pub fn new(store: RecordStore<R>, state: ViewState) -> Result<Self, ConfigurationError> {
        let result = materialize(store.records(), &state)?;
        Ok(Self {
            store,
            state,
            result,
            expansion: ExpansionState::new(),
            revision: 0,
            listeners: Vec::new(),
        })
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn result(&self) -> &ViewResult<R> {
        &self.result
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Publication<'_, R>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply one event and return the new revision.
    pub fn handle(&mut self, event: ViewEvent) -> Result<u64, ConfigurationError> {
        match event {
            ViewEvent::StateChanged(state) => self.set_state(state),
            ViewEvent::ExpandToggled(node) => {
                self.toggle(node);
                Ok(self.revision)
            }
        }
    }

    /// Recompute with `state`. On error the previous state and result stay.
    pub fn set_state(&mut self, state: ViewState) -> Result<u64, ConfigurationError> {
        let result = materialize(self.store.records(), &state)
            .inspect_err(|error| warn!(%error, "view state rejected; keeping the previous view"))?;
        self.state = state;
        self.result = result;
        self.publish(PublishReason::Recomputed);
        Ok(self.revision)
    }

    /// Flip one node without recomputing; returns the new flag.
    pub fn toggle(&mut self, node: NodeId) -> bool {
        let expanded = self.expansion.toggle(node);
        debug!(expanded, "node toggled");
        self.publish(PublishReason::ExpansionChanged);
        expanded
    }

    pub fn set_expanded(&mut self, node: NodeId, expanded: bool) {
        if self.expansion.is_expanded(&node) != expanded {
            self.toggle(node);
        }
    }

    fn publish(&mut self, reason: PublishReason) {
        self.revision += 1;
        let publication = Publication {
            revision: self.revision,
            reason,
            result: &self.result,
            expansion: &self.expansion,
        };
        for listener in &mut self.listeners {
            listener(&publication);
        }
    }

    /// Flatten the current result into display rows.
    ///
    /// Collapsed groups hide everything below their header; expanded records
    /// are followed by a detail row.
    pub fn render(&self) -> Vec<RenderRow<'_, R>> {
        let mut rows = Vec::new();
        match &self.result.data {
            ViewData::Flat(records) => self.render_records(records, 0, &mut rows),
            ViewData::Grouped(groups) => {
                self.render_groups(groups, &GroupPath::default(), 0, &mut rows);
            }
        }
        rows
    }

    fn render_groups<'a>(
        &'a self,
        groups: &'a [GroupNode<R>],
        parent: &GroupPath,
        depth: usize,
        rows: &mut Vec<RenderRow<'a, R>>,
    ) {
        for group in groups {
            let path = parent.child(&group.field, &group.value);
            let expanded = self.expansion.is_expanded(&NodeId::Group(path.clone()));
            rows.push(RenderRow::GroupHeader {
                depth,
                path: path.clone(),
                group,
                expanded,
            });
            if !expanded {
                continue;
            }
            match &group.items {
                GroupItems::Records(records) => self.render_records(records, depth + 1, rows),
                GroupItems::Groups(children) => {
                    self.render_groups(children, &path, depth + 1, rows);
                }
            }
        }
    }

    fn render_records<'a>(
        &'a self,
        records: &'a [Arc<R>],
        depth: usize,
        rows: &mut Vec<RenderRow<'a, R>>,
    ) {
        for record in records {
            let expanded = self.expansion.is_expanded(&NodeId::Record(record.id()));
            rows.push(RenderRow::Record {
                depth,
                record,
                expanded,
            });
            if expanded {
                rows.push(RenderRow::Detail { depth, record });
            }
        }
    }
}
