//! Tests for orders-model types.

use orders_model::{
    AggregateKind, FieldType, FieldValue, FilterNode, FilterOperator, GroupDescriptor, Order,
    PageDescriptor, Record, RecordId, RecordStore, ShipAddress, SortDirection, ViewState,
};

fn order(id: i64, customer: &str, freight: Option<f64>) -> Order {
    Order {
        order_id: id,
        customer_id: customer.to_string(),
        employee_id: Some(5),
        order_date: None,
        required_date: None,
        shipped_date: None,
        ship_via: Some(3),
        freight,
        ship_name: format!("Ship {customer}"),
        ship_address: ShipAddress {
            street: "59 rue de l'Abbaye".to_string(),
            city: "Reims".to_string(),
            region: None,
            postal_code: "51100".to_string(),
            country: "France".to_string(),
        },
        details: vec![],
    }
}

#[test]
fn record_exposes_schema_fields() {
    let schema = Order::schema();
    for def in schema.fields() {
        let value = order(1, "A", Some(1.0)).value(def.name);
        if let Some(actual) = value.field_type() {
            assert_eq!(actual, def.field_type, "field {}", def.name);
        }
    }
    assert_eq!(
        schema.get("shipAddress.city").map(|d| d.field_type),
        Some(FieldType::Text)
    );
    assert!(schema.get("expanded").is_none());
}

#[test]
fn absent_values_are_missing() {
    let record = order(1, "A", None);
    assert!(record.value("freight").is_missing());
    assert!(record.value("orderDate").is_missing());
    assert!(record.value("shipAddress.region").is_missing());
    assert_eq!(record.value("shipAddress.city"), FieldValue::text("Reims"));
}

#[test]
fn store_preserves_order_and_shares_records() {
    let store = RecordStore::new(vec![order(3, "C", None), order(1, "A", None)]);
    let copy = store.clone();
    let ids: Vec<i64> = copy.iter().map(|o| o.order_id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert!(std::sync::Arc::ptr_eq(&store.records()[0], &copy.records()[0]));
    assert_eq!(store.get(RecordId(1)).map(|o| o.customer_id.as_str()), Some("A"));
}

#[test]
fn view_state_round_trips_through_json() {
    let state = ViewState::new()
        .with_filter(FilterNode::clause("freight", FilterOperator::Gt, 15.0))
        .with_group(GroupDescriptor::new("customerID").with_aggregate("freight", AggregateKind::Sum))
        .with_page(0, 20);
    let json = serde_json::to_string(&state).expect("serialize state");
    let round: ViewState = serde_json::from_str(&json).expect("deserialize state");
    assert_eq!(round, state);
}

#[test]
fn view_state_reads_camel_case_json() {
    let json = r#"{
        "filter": {
            "logic": "or",
            "filters": [
                { "field": "customerID", "operator": "eq", "value": "vinet" },
                { "field": "freight", "operator": "gte", "value": 30, "ignoreCase": false }
            ]
        },
        "sort": [{ "field": "orderDate", "dir": "desc" }],
        "group": [{ "field": "customerID" }],
        "page": { "skip": 10, "take": 5 }
    }"#;
    let state: ViewState = serde_json::from_str(json).expect("parse state");
    assert_eq!(state.sort_direction("orderDate"), Some(SortDirection::Desc));
    assert_eq!(state.page.map(|p| (p.skip, p.take)), Some((10, 5)));
    let Some(FilterNode::Composite(composite)) = state.filter else {
        panic!("expected composite filter");
    };
    assert_eq!(composite.filters.len(), 2);
    let FilterNode::Clause(second) = &composite.filters[1] else {
        panic!("expected clause");
    };
    assert_eq!(second.value, FieldValue::Number(30.0));
    assert!(!second.ignore_case);
}

#[test]
fn negative_page_bounds_read_as_zero() {
    let state: ViewState =
        serde_json::from_str(r#"{ "page": { "skip": -3, "take": -1 } }"#).expect("parse state");
    assert_eq!(state.page, Some(PageDescriptor::new(0, 0)));

    let state: ViewState = serde_json::from_str(r#"{ "page": { "take": 5 } }"#).expect("parse state");
    assert_eq!(state.page, Some(PageDescriptor::new(0, 5)));
}
