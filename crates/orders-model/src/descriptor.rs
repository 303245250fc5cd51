//! Declarative view-state descriptors: filter, sort, group and page.
//!
//! Descriptors are plain data. Operator and aggregate names are kept as text
//! so that a state loaded from a file is checked by the same code path as one
//! built in code; [`FilterClause::resolve_operator`] and
//! [`AggregateDescriptor::resolve`] turn them into typed values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::schema::{FieldDef, FieldSchema};
use crate::value::{FieldType, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    StartsWith,
    EndsWith,
    Contains,
    DoesNotContain,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 14] = [
        FilterOperator::Eq,
        FilterOperator::Neq,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::Contains,
        FilterOperator::DoesNotContain,
        FilterOperator::IsNull,
        FilterOperator::IsNotNull,
        FilterOperator::IsEmpty,
        FilterOperator::IsNotEmpty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::StartsWith => "startswith",
            FilterOperator::EndsWith => "endswith",
            FilterOperator::Contains => "contains",
            FilterOperator::DoesNotContain => "doesnotcontain",
            FilterOperator::IsNull => "isnull",
            FilterOperator::IsNotNull => "isnotnull",
            FilterOperator::IsEmpty => "isempty",
            FilterOperator::IsNotEmpty => "isnotempty",
        }
    }

    /// Whether the operator ignores the clause value.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            FilterOperator::IsNull
                | FilterOperator::IsNotNull
                | FilterOperator::IsEmpty
                | FilterOperator::IsNotEmpty
        )
    }

    /// Whether the operator can be evaluated against a field of `field_type`.
    pub fn applies_to(&self, field_type: FieldType) -> bool {
        match self {
            FilterOperator::Eq
            | FilterOperator::Neq
            | FilterOperator::Lt
            | FilterOperator::Lte
            | FilterOperator::Gt
            | FilterOperator::Gte
            | FilterOperator::IsNull
            | FilterOperator::IsNotNull => true,
            FilterOperator::StartsWith
            | FilterOperator::EndsWith
            | FilterOperator::Contains
            | FilterOperator::DoesNotContain
            | FilterOperator::IsEmpty
            | FilterOperator::IsNotEmpty => field_type == FieldType::Text,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let operator = match normalized.as_str() {
            "=" | "==" => FilterOperator::Eq,
            "!=" | "<>" => FilterOperator::Neq,
            "<" => FilterOperator::Lt,
            "<=" => FilterOperator::Lte,
            ">" => FilterOperator::Gt,
            ">=" => FilterOperator::Gte,
            other => FilterOperator::ALL
                .into_iter()
                .find(|op| op.as_str() == other)
                .ok_or_else(|| s.trim().to_string())?,
        };
        Ok(operator)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLogic {
    #[default]
    And,
    Or,
}

/// A single predicate: `field <operator> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: FieldValue,
    #[serde(default = "default_ignore_case")]
    pub ignore_case: bool,
}

fn default_ignore_case() -> bool {
    true
}

impl FilterClause {
    /// Parse the operator name and check it against the field type.
    pub fn resolve_operator(&self, field: &FieldDef) -> Result<FilterOperator> {
        let unsupported = || ConfigurationError::UnsupportedOperator {
            operator: self.operator.clone(),
            field: field.name.to_string(),
        };
        let operator = FilterOperator::from_str(&self.operator).map_err(|_| unsupported())?;
        if operator.applies_to(field.field_type) {
            Ok(operator)
        } else {
            Err(unsupported())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeFilter {
    #[serde(default)]
    pub logic: FilterLogic,
    pub filters: Vec<FilterNode>,
}

/// A boolean predicate tree over record fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Composite(CompositeFilter),
    Clause(FilterClause),
}

impl FilterNode {
    pub fn clause(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FieldValue>,
    ) -> Self {
        FilterNode::Clause(FilterClause {
            field: field.into(),
            operator: operator.as_str().to_string(),
            value: value.into(),
            ignore_case: true,
        })
    }

    pub fn and(filters: Vec<FilterNode>) -> Self {
        FilterNode::Composite(CompositeFilter {
            logic: FilterLogic::And,
            filters,
        })
    }

    pub fn or(filters: Vec<FilterNode>) -> Self {
        FilterNode::Composite(CompositeFilter {
            logic: FilterLogic::Or,
            filters,
        })
    }

    /// Mark every clause in the tree as case-sensitive or not.
    #[must_use]
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.set_ignore_case(ignore_case);
        self
    }

    fn set_ignore_case(&mut self, ignore_case: bool) {
        match self {
            FilterNode::Clause(clause) => clause.ignore_case = ignore_case,
            FilterNode::Composite(composite) => {
                for filter in &mut composite.filters {
                    filter.set_ignore_case(ignore_case);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub field: String,
    #[serde(default)]
    pub dir: SortDirection,
}

impl SortDescriptor {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    Count,
    Sum,
    Average,
    Min,
    Max,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Count => "count",
            AggregateKind::Sum => "sum",
            AggregateKind::Average => "average",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
        }
    }

    pub fn applies_to(&self, field_type: FieldType) -> bool {
        match self {
            AggregateKind::Sum | AggregateKind::Average => field_type == FieldType::Number,
            AggregateKind::Count | AggregateKind::Min | AggregateKind::Max => true,
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateKind::Count),
            "sum" => Ok(AggregateKind::Sum),
            "average" | "avg" => Ok(AggregateKind::Average),
            "min" => Ok(AggregateKind::Min),
            "max" => Ok(AggregateKind::Max),
            _ => Err(s.trim().to_string()),
        }
    }
}

/// Request for one aggregate over `field` in every group of a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateDescriptor {
    pub field: String,
    pub aggregate: String,
}

impl AggregateDescriptor {
    pub fn new(field: impl Into<String>, aggregate: AggregateKind) -> Self {
        Self {
            field: field.into(),
            aggregate: aggregate.as_str().to_string(),
        }
    }

    pub fn resolve(&self, schema: &FieldSchema) -> Result<(&'static FieldDef, AggregateKind)> {
        let def = schema.require(&self.field)?;
        let unsupported = || ConfigurationError::UnsupportedAggregate {
            aggregate: self.aggregate.clone(),
            field: self.field.clone(),
        };
        let kind = AggregateKind::from_str(&self.aggregate).map_err(|_| unsupported())?;
        if kind.applies_to(def.field_type) {
            Ok((def, kind))
        } else {
            Err(unsupported())
        }
    }
}

/// One grouping level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    pub field: String,
    #[serde(default)]
    pub aggregates: Vec<AggregateDescriptor>,
}

impl GroupDescriptor {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            aggregates: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_aggregate(mut self, field: impl Into<String>, aggregate: AggregateKind) -> Self {
        self.aggregates.push(AggregateDescriptor::new(field, aggregate));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    #[serde(default, deserialize_with = "non_negative")]
    pub skip: usize,
    #[serde(deserialize_with = "non_negative")]
    pub take: usize,
}

/// Page bounds below zero read as zero, so `take: -1` is an empty page.
fn non_negative<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(usize::try_from(value).unwrap_or(0))
}

impl PageDescriptor {
    pub fn new(skip: usize, take: usize) -> Self {
        Self { skip, take }
    }
}

/// Everything the grid needs to project a record store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub filter: Option<FilterNode>,
    pub sort: Vec<SortDescriptor>,
    pub group: Vec<GroupDescriptor>,
    pub page: Option<PageDescriptor>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortDescriptor) -> Self {
        self.sort.push(sort);
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: GroupDescriptor) -> Self {
        self.group.push(group);
        self
    }

    #[must_use]
    pub fn with_page(mut self, skip: usize, take: usize) -> Self {
        self.page = Some(PageDescriptor::new(skip, take));
        self
    }

    pub fn sort_direction(&self, field: &str) -> Option<SortDirection> {
        self.sort
            .iter()
            .find(|sort| sort.field == field)
            .map(|sort| sort.dir)
    }
}
