//! Compact text forms of descriptors, as typed on a command line.
//!
//! - filter: `field:operator[:value]`, e.g. `freight:gt:15`
//! - sort: `field[:asc|desc]`
//! - group: `field[:agg(field),agg(field)...]`, e.g. `customerID:sum(freight)`

use std::str::FromStr;

use crate::columns::{ColumnSpec, find_column};
use crate::descriptor::{
    AggregateDescriptor, FilterNode, FilterOperator, GroupDescriptor, SortDescriptor,
    SortDirection,
};
use crate::error::{ConfigurationError, Result};
use crate::schema::FieldSchema;
use crate::value::FieldValue;

pub fn parse_filter_clause(text: &str, schema: &FieldSchema) -> Result<FilterNode> {
    let mut parts = text.splitn(3, ':');
    let field = parts.next().map(str::trim).unwrap_or_default();
    if field.is_empty() {
        return Err(ConfigurationError::invalid(
            text,
            "expected field:operator[:value]",
        ));
    }
    let operator_text = parts
        .next()
        .map(str::trim)
        .ok_or_else(|| ConfigurationError::invalid(text, "missing operator"))?;
    let def = schema.require(field)?;
    let operator = FilterOperator::from_str(operator_text).map_err(|operator| {
        ConfigurationError::UnsupportedOperator {
            operator,
            field: def.name.to_string(),
        }
    })?;
    if !operator.applies_to(def.field_type) {
        return Err(ConfigurationError::UnsupportedOperator {
            operator: operator.to_string(),
            field: def.name.to_string(),
        });
    }
    let value = if operator.is_unary() {
        FieldValue::Missing
    } else {
        let raw = parts.next().ok_or_else(|| {
            ConfigurationError::invalid(text, format!("operator {operator} needs a value"))
        })?;
        FieldValue::text(raw)
            .coerce_to(def.field_type)
            .ok_or_else(|| ConfigurationError::InvalidValue {
                value: raw.to_string(),
                field: def.name.to_string(),
            })?
    };
    Ok(FilterNode::clause(def.name, operator, value))
}

/// Reject filters on columns the grid marks as not filterable.
pub fn check_filterable(field: &str, columns: &[ColumnSpec]) -> Result<()> {
    match find_column(columns, field) {
        Some(column) if !column.filterable => Err(ConfigurationError::invalid(
            field,
            "column is not filterable",
        )),
        _ => Ok(()),
    }
}

pub fn parse_sort(text: &str, schema: &FieldSchema) -> Result<SortDescriptor> {
    let (field, dir) = match text.split_once(':') {
        Some((field, dir)) => {
            let dir = SortDirection::from_str(dir)
                .map_err(|message| ConfigurationError::invalid(text, message))?;
            (field.trim(), dir)
        }
        None => (text.trim(), SortDirection::Asc),
    };
    let def = schema.require(field)?;
    Ok(SortDescriptor {
        field: def.name.to_string(),
        dir,
    })
}

pub fn parse_group(text: &str, schema: &FieldSchema) -> Result<GroupDescriptor> {
    let (field, aggregates) = match text.split_once(':') {
        Some((field, aggregates)) => (field.trim(), aggregates),
        None => (text.trim(), ""),
    };
    let def = schema.require(field)?;
    let mut group = GroupDescriptor::new(def.name);
    for item in aggregates.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let aggregate = parse_aggregate(item)
            .ok_or_else(|| ConfigurationError::invalid(item, "expected aggregate(field)"))?;
        aggregate.resolve(schema)?;
        group.aggregates.push(aggregate);
    }
    Ok(group)
}

fn parse_aggregate(text: &str) -> Option<AggregateDescriptor> {
    let (kind, rest) = text.split_once('(')?;
    let field = rest.strip_suffix(')')?.trim();
    if field.is_empty() {
        return None;
    }
    Some(AggregateDescriptor {
        field: field.to_string(),
        aggregate: kind.trim().to_ascii_lowercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Order;
    use crate::columns::order_columns;
    use crate::descriptor::AggregateKind;
    use crate::schema::Record;

    #[test]
    fn parses_numeric_filter() {
        let node = parse_filter_clause("freight:gt:15", &Order::schema()).unwrap();
        let FilterNode::Clause(clause) = node else {
            panic!("expected clause");
        };
        assert_eq!(clause.field, "freight");
        assert_eq!(clause.operator, "gt");
        assert_eq!(clause.value, FieldValue::Number(15.0));
    }

    #[test]
    fn keeps_colons_in_values() {
        let node = parse_filter_clause("shipName:contains:a:b", &Order::schema()).unwrap();
        let FilterNode::Clause(clause) = node else {
            panic!("expected clause");
        };
        assert_eq!(clause.value, FieldValue::text("a:b"));
    }

    #[test]
    fn rejects_text_operator_on_number() {
        let err = parse_filter_clause("freight:contains:1", &Order::schema()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnsupportedOperator {
                operator: "contains".to_string(),
                field: "freight".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unknown_field_and_bad_value() {
        let schema = Order::schema();
        assert_eq!(
            parse_filter_clause("nope:eq:1", &schema).unwrap_err(),
            ConfigurationError::UnknownField("nope".to_string())
        );
        assert!(matches!(
            parse_filter_clause("orderDate:gt:yesterday", &schema).unwrap_err(),
            ConfigurationError::InvalidValue { .. }
        ));
    }

    #[test]
    fn parses_group_with_aggregates() {
        let group =
            parse_group("customerID:sum(freight), count(orderID)", &Order::schema()).unwrap();
        assert_eq!(group.field, "customerID");
        assert_eq!(
            group.aggregates,
            vec![
                AggregateDescriptor::new("freight", AggregateKind::Sum),
                AggregateDescriptor::new("orderID", AggregateKind::Count),
            ]
        );
    }

    #[test]
    fn rejects_sum_over_text() {
        let err = parse_group("customerID:sum(shipName)", &Order::schema()).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsupportedAggregate { .. }));
    }

    #[test]
    fn order_id_is_not_filterable() {
        assert!(check_filterable("orderID", order_columns()).is_err());
        assert!(check_filterable("freight", order_columns()).is_ok());
        assert!(check_filterable("shipAddress.city", order_columns()).is_ok());
    }

    #[test]
    fn sort_defaults_to_ascending() {
        let sort = parse_sort("orderDate", &Order::schema()).unwrap();
        assert_eq!(sort, SortDescriptor::asc("orderDate"));
        let sort = parse_sort("orderDate:desc", &Order::schema()).unwrap();
        assert_eq!(sort, SortDescriptor::desc("orderDate"));
    }
}
