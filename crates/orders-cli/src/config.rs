//! View state configuration.
//!
//! A view state starts from the grid defaults or from a `--state` file
//! (TOML or JSON) and is then adjusted by command-line descriptors.

use std::path::Path;

use anyhow::{Context, Result, bail};

use orders_model::{
    ConfigurationError, FieldValue, FilterLogic, FilterNode, GroupDescriptor, GroupPath, Order,
    PageDescriptor, Record, SortDescriptor, ViewState, check_filterable, order_columns,
    parse_filter_clause, parse_group, parse_sort,
};

pub const DEFAULT_TAKE: usize = 20;

/// skip 0, take 20, newest orders first, grouped by customer.
pub fn default_view_state() -> ViewState {
    ViewState::new()
        .with_sort(SortDescriptor::desc("orderDate"))
        .with_group(GroupDescriptor::new("customerID"))
        .with_page(0, DEFAULT_TAKE)
}

/// Command-line adjustments applied on top of the base state.
#[derive(Debug, Clone, Default)]
pub struct StateOverrides {
    /// `field:operator[:value]` clauses; replace the base filter.
    pub filters: Vec<String>,
    pub logic: FilterLogic,
    pub case_sensitive: bool,
    /// `field[:dir]`; replace the base sort.
    pub sort: Vec<String>,
    pub no_sort: bool,
    /// `field[:aggregate(field),...]`; replace the base groups.
    pub group: Vec<String>,
    pub no_group: bool,
    pub skip: Option<usize>,
    pub take: Option<usize>,
    pub no_page: bool,
}

pub fn load_state_file(path: &Path) -> Result<ViewState> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read view state {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(&text).with_context(|| format!("parse view state {}", path.display()))
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse view state {}", path.display()))
    }
}

pub fn resolve_view_state(file: Option<&Path>, overrides: &StateOverrides) -> Result<ViewState> {
    let mut state = match file {
        Some(path) => load_state_file(path)?,
        None => default_view_state(),
    };
    apply_overrides(&mut state, overrides)?;
    Ok(state)
}

pub fn apply_overrides(state: &mut ViewState, overrides: &StateOverrides) -> Result<()> {
    let schema = Order::schema();
    let columns = order_columns();

    if !overrides.filters.is_empty() {
        let mut clauses = Vec::with_capacity(overrides.filters.len());
        for text in &overrides.filters {
            let clause = parse_filter_clause(text, &schema)
                .and_then(|clause| {
                    if let FilterNode::Clause(inner) = &clause {
                        check_filterable(&inner.field, columns)?;
                    }
                    Ok(clause)
                })
                .with_context(|| format!("--filter {text}"))?;
            clauses.push(clause);
        }
        state.filter = Some(match (clauses.len(), overrides.logic) {
            (1, _) => clauses.remove(0),
            (_, FilterLogic::And) => FilterNode::and(clauses),
            (_, FilterLogic::Or) => FilterNode::or(clauses),
        });
    }
    if overrides.case_sensitive {
        state.filter = state.filter.take().map(|filter| filter.with_ignore_case(false));
    }

    if overrides.no_sort {
        state.sort.clear();
    } else if !overrides.sort.is_empty() {
        state.sort = overrides
            .sort
            .iter()
            .map(|text| parse_sort(text, &schema).with_context(|| format!("--sort {text}")))
            .collect::<Result<_>>()?;
    }

    if overrides.no_group {
        state.group.clear();
    } else if !overrides.group.is_empty() {
        state.group = overrides
            .group
            .iter()
            .map(|text| parse_group(text, &schema).with_context(|| format!("--group {text}")))
            .collect::<Result<_>>()?;
    }

    if overrides.no_page {
        state.page = None;
    } else if overrides.skip.is_some() || overrides.take.is_some() {
        let current = state.page.unwrap_or(PageDescriptor::new(0, DEFAULT_TAKE));
        state.page = Some(PageDescriptor::new(
            overrides.skip.unwrap_or(current.skip),
            overrides.take.unwrap_or(current.take),
        ));
    }
    Ok(())
}

/// Parse `field=value[/field=value...]` into a group path.
///
/// Values are read as the field's type; an empty value is the missing-value
/// group.
pub fn parse_group_path(text: &str) -> Result<GroupPath> {
    let schema = Order::schema();
    let mut path = GroupPath::default();
    for segment in text.split('/') {
        let Some((field, value)) = segment.split_once('=') else {
            bail!("group path segment '{segment}' is not field=value");
        };
        let def = schema.require(field.trim())?;
        let raw = value.trim();
        let value = if raw.is_empty() {
            FieldValue::Missing
        } else {
            FieldValue::text(raw)
                .coerce_to(def.field_type)
                .ok_or_else(|| ConfigurationError::InvalidValue {
                    value: raw.to_string(),
                    field: def.name.to_string(),
                })?
        };
        path = path.child(def.name, &value);
    }
    Ok(path)
}
