//! The data view processor.
//!
//! [`materialize`] projects a borrowed slice of records through the filter,
//! sort, group and page stages, in that order. Every descriptor is compiled
//! against the record schema before the first record is read.

use std::sync::Arc;

use tracing::{debug, debug_span};

use orders_model::{
    ConfigurationError, FieldSchema, Record, RecordStore, ViewData, ViewResult, ViewState,
};

use crate::filter::{self, CompiledFilter};
use crate::group::{self, GroupLevel};
use crate::page::page;
use crate::sort::{self, SortKey};

/// A [`ViewState`] resolved against one record schema.
#[derive(Debug, Clone)]
struct ViewPlan {
    filter: Option<CompiledFilter>,
    sort: Vec<SortKey>,
    groups: Vec<GroupLevel>,
}

impl ViewPlan {
    fn compile(state: &ViewState, schema: &FieldSchema) -> Result<Self, ConfigurationError> {
        let filter = state
            .filter
            .as_ref()
            .map(|node| filter::compile(node, schema))
            .transpose()?;
        Ok(Self {
            filter,
            sort: sort::compile(&state.sort, schema)?,
            groups: group::compile(&state.group, state, schema)?,
        })
    }
}

/// Check every descriptor of `state` against the schema of `R`.
pub fn validate<R: Record>(state: &ViewState) -> Result<(), ConfigurationError> {
    ViewPlan::compile(state, &R::schema()).map(|_| ())
}

/// Compute the view of `records` described by `state`.
///
/// The input is never modified. `total` counts top-level items (records,
/// or top-level groups when grouping) before paging.
pub fn materialize<R: Record>(
    records: &[Arc<R>],
    state: &ViewState,
) -> Result<ViewResult<R>, ConfigurationError> {
    let plan = ViewPlan::compile(state, &R::schema())?;

    let span = debug_span!("materialize", input = records.len());
    let _guard = span.enter();

    let mut rows: Vec<Arc<R>> = match &plan.filter {
        Some(filter) => records
            .iter()
            .filter(|&record| filter.matches(&**record))
            .cloned()
            .collect(),
        None => records.to_vec(),
    };
    let record_count = rows.len();
    debug!(record_count, "filter applied");

    sort::sort_records(&mut rows, &plan.sort);

    let (data, total) = if plan.groups.is_empty() {
        let total = rows.len();
        (ViewData::Flat(page(rows, state.page)), total)
    } else {
        let groups = group::group_records(rows, &plan.groups);
        debug!(groups = groups.len(), levels = plan.groups.len(), "records grouped");
        let total = groups.len();
        (ViewData::Grouped(page(groups, state.page)), total)
    };

    let result = ViewResult {
        data,
        total,
        record_count,
    };
    debug!(total, visible = result.len(), "view materialized");
    Ok(result)
}

/// [`materialize`] over a whole store.
pub fn materialize_store<R: Record>(
    store: &RecordStore<R>,
    state: &ViewState,
) -> Result<ViewResult<R>, ConfigurationError> {
    materialize(store.records(), state)
}
