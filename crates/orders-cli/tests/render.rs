//! Tests for grid rendering.

use orders_cli::config::default_view_state;
use orders_cli::render::{detail_lines, json_view, render_view};
use orders_ingest::{LoadOptions, LocaleContext, load_sample_orders};
use orders_model::{
    AggregateKind, FieldValue, GroupDescriptor, GroupPath, NodeId, RecordId, SortDescriptor,
    ViewState,
};
use orders_view::ViewStateController;

fn controller(locale: &LocaleContext, state: ViewState) -> ViewStateController<orders_model::Order> {
    let loaded = load_sample_orders(locale, &LoadOptions::default()).unwrap();
    ViewStateController::new(loaded.store, state).unwrap()
}

#[test]
fn default_view_shows_groups_and_pager() {
    let locale = LocaleContext::new("en-US").unwrap();
    let controller = controller(&locale, default_view_state());
    let text = render_view(&controller, &locale);

    assert!(text.contains("▾ customerID: VINET"), "{text}");
    assert!(text.contains("records)"));
    assert!(text.contains("Thursday, July 4, 1996"));
    let total = controller.result().total;
    assert!(text.trim_end().ends_with(&format!("of {total} items")), "{text}");
}

#[test]
fn collapsed_groups_and_expanded_records() {
    let locale = LocaleContext::new("es").unwrap();
    let state = ViewState::new()
        .with_sort(SortDescriptor::asc("orderID"))
        .with_group(GroupDescriptor::new("customerID").with_aggregate("freight", AggregateKind::Sum));
    let mut controller = controller(&locale, state);
    controller.set_expanded(
        NodeId::Group(GroupPath::default().child("customerID", &FieldValue::text("VINET"))),
        false,
    );
    controller.set_expanded(NodeId::Record(RecordId(10249)), true);

    let text = render_view(&controller, &locale);
    assert!(text.contains("▸ customerID: VINET"));
    assert!(text.contains("sum(freight) = "));
    assert!(text.contains("Calle: "));
    assert!(text.contains("elementos"));
}

#[test]
fn detail_lists_address_and_line_items() {
    let locale = LocaleContext::new("en-US").unwrap();
    let loaded = load_sample_orders(&locale, &LoadOptions::default()).unwrap();
    let order = loaded.store.get(RecordId(10248)).unwrap();

    let lines = detail_lines(order, &locale);
    assert_eq!(lines[0], "Street: 59 rue de l'Abbaye");
    assert_eq!(lines[1], "City: Reims");
    assert_eq!(lines[2], "Country: France");
    assert_eq!(lines[3], "Postal Code: 51100");
    assert!(lines.iter().any(|line| line.contains("Product")));
    assert!(lines.last().unwrap().starts_with("Total: "));
}

#[test]
fn empty_views_say_so() {
    let locale = LocaleContext::new("en-US").unwrap();
    let state = ViewState::new().with_filter(orders_model::FilterNode::clause(
        "customerID",
        orders_model::FilterOperator::Eq,
        "NOBODY",
    ));
    let controller = controller(&locale, state);
    assert_eq!(render_view(&controller, &locale), "No records available.\n");
}

#[test]
fn json_rows_follow_the_render_order() {
    let locale = LocaleContext::new("en-US").unwrap();
    let state = ViewState::new()
        .with_sort(SortDescriptor::asc("orderID"))
        .with_page(0, 2);
    let mut controller = controller(&locale, state);
    controller.set_expanded(NodeId::Record(RecordId(10248)), true);

    let json = serde_json::to_value(json_view(&controller)).unwrap();
    insta::assert_json_snapshot!(
        json["rows"].as_array().unwrap().iter().map(|row| (&row["kind"], row.get("depth"))).collect::<Vec<_>>(),
        @r#"
    [
      [
        "record",
        0
      ],
      [
        "detail",
        0
      ],
      [
        "record",
        0
      ]
    ]
    "#
    );
    assert_eq!(json["total"], 40);
    assert_eq!(json["revision"], 1);
}
