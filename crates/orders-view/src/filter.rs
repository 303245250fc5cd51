//! Filter stage.
//!
//! A [`FilterNode`] tree is compiled once per call: field names are checked
//! against the schema, operator names are resolved, and clause values are
//! coerced to the field type. Evaluation then only reads record values.

use std::cmp::Ordering;

use tracing::debug;

use orders_model::{
    ConfigurationError, FieldSchema, FieldType, FieldValue, FilterLogic, FilterNode,
    FilterOperator, Record,
};

#[derive(Debug, Clone)]
pub(crate) enum CompiledFilter {
    Clause(CompiledClause),
    All(Vec<CompiledFilter>),
    Any(Vec<CompiledFilter>),
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledClause {
    field: &'static str,
    operator: FilterOperator,
    value: FieldValue,
    ignore_case: bool,
    /// The clause value could not be read as the field type.
    mismatched: bool,
}

pub(crate) fn compile(
    node: &FilterNode,
    schema: &FieldSchema,
) -> Result<CompiledFilter, ConfigurationError> {
    match node {
        FilterNode::Composite(composite) => {
            let filters = composite
                .filters
                .iter()
                .map(|child| compile(child, schema))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match composite.logic {
                FilterLogic::And => CompiledFilter::All(filters),
                FilterLogic::Or => CompiledFilter::Any(filters),
            })
        }
        FilterNode::Clause(clause) => {
            let def = schema.require(&clause.field)?;
            let operator = clause.resolve_operator(def)?;
            let value = if operator.is_unary() {
                Some(FieldValue::Missing)
            } else {
                coerce_value(&clause.value, def.field_type, def.name)
            };
            let mismatched = value.is_none();
            let value = value.unwrap_or_default();
            let value = match (value, clause.ignore_case) {
                (FieldValue::Text(text), true) => FieldValue::Text(text.to_lowercase()),
                (value, _) => value,
            };
            Ok(CompiledFilter::Clause(CompiledClause {
                field: def.name,
                operator,
                value,
                ignore_case: clause.ignore_case,
                mismatched,
            }))
        }
    }
}

fn coerce_value(value: &FieldValue, field_type: FieldType, field: &str) -> Option<FieldValue> {
    let coerced = value.coerce_to(field_type);
    if coerced.is_none() {
        debug!(
            field,
            expected = %field_type,
            "filter value does not match field type; clause matches nothing"
        );
    }
    coerced
}

impl CompiledFilter {
    pub(crate) fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            CompiledFilter::Clause(clause) => clause.matches(record),
            CompiledFilter::All(filters) => filters.iter().all(|f| f.matches(record)),
            CompiledFilter::Any(filters) => {
                filters.is_empty() || filters.iter().any(|f| f.matches(record))
            }
        }
    }
}

impl CompiledClause {
    fn matches<R: Record>(&self, record: &R) -> bool {
        if self.mismatched {
            return false;
        }
        let actual = record.value(self.field);
        let actual = match (actual, self.ignore_case) {
            (FieldValue::Text(text), true) => FieldValue::Text(text.to_lowercase()),
            (actual, _) => actual,
        };
        evaluate(self.operator, &actual, &self.value)
    }
}

/// Apply one operator. Text inputs arrive already case-folded when needed.
fn evaluate(operator: FilterOperator, actual: &FieldValue, expected: &FieldValue) -> bool {
    match operator {
        FilterOperator::IsNull => actual.is_missing(),
        FilterOperator::IsNotNull => !actual.is_missing(),
        FilterOperator::IsEmpty => is_empty(actual),
        FilterOperator::IsNotEmpty => !is_empty(actual),
        FilterOperator::Neq => !equals(actual, expected),
        FilterOperator::DoesNotContain => !text_test(actual, expected, |a, b| a.contains(b)),
        FilterOperator::Eq => equals(actual, expected),
        FilterOperator::Lt => compare(actual, expected) == Some(Ordering::Less),
        FilterOperator::Lte => matches!(
            compare(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOperator::Gt => compare(actual, expected) == Some(Ordering::Greater),
        FilterOperator::Gte => matches!(
            compare(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOperator::StartsWith => text_test(actual, expected, |a, b| a.starts_with(b)),
        FilterOperator::EndsWith => text_test(actual, expected, |a, b| a.ends_with(b)),
        FilterOperator::Contains => text_test(actual, expected, |a, b| a.contains(b)),
    }
}

fn is_empty(value: &FieldValue) -> bool {
    match value {
        FieldValue::Missing => true,
        FieldValue::Text(text) => text.is_empty(),
        _ => false,
    }
}

/// Same-type comparison; `None` when either side is missing or types differ.
fn compare(actual: &FieldValue, expected: &FieldValue) -> Option<Ordering> {
    if actual.is_missing() || expected.is_missing() {
        return None;
    }
    if actual.field_type() != expected.field_type() {
        return None;
    }
    Some(actual.cmp(expected))
}

fn equals(actual: &FieldValue, expected: &FieldValue) -> bool {
    compare(actual, expected) == Some(Ordering::Equal)
}

fn text_test(
    actual: &FieldValue,
    expected: &FieldValue,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    match (actual.as_text(), expected.as_text()) {
        (Some(actual), Some(expected)) => test(actual, expected),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_never_satisfies_comparisons() {
        let expected = FieldValue::Number(1.0);
        for operator in [
            FilterOperator::Eq,
            FilterOperator::Lt,
            FilterOperator::Lte,
            FilterOperator::Gt,
            FilterOperator::Gte,
        ] {
            assert!(!evaluate(operator, &FieldValue::Missing, &expected), "{operator}");
        }
        assert!(evaluate(FilterOperator::Neq, &FieldValue::Missing, &expected));
        assert!(evaluate(FilterOperator::IsNull, &FieldValue::Missing, &expected));
    }

    #[test]
    fn mismatched_types_do_not_match() {
        let actual = FieldValue::Number(20.0);
        let expected = FieldValue::text("15");
        assert!(!evaluate(FilterOperator::Gt, &actual, &expected));
        assert!(!evaluate(FilterOperator::Eq, &actual, &expected));
    }

    #[test]
    fn text_operators() {
        let actual = FieldValue::text("vins et alcools");
        assert!(evaluate(FilterOperator::StartsWith, &actual, &FieldValue::text("vins")));
        assert!(evaluate(FilterOperator::EndsWith, &actual, &FieldValue::text("alcools")));
        assert!(evaluate(FilterOperator::Contains, &actual, &FieldValue::text("et")));
        assert!(!evaluate(FilterOperator::DoesNotContain, &actual, &FieldValue::text("et")));
        assert!(evaluate(FilterOperator::IsEmpty, &FieldValue::text(""), &FieldValue::Missing));
    }
}
