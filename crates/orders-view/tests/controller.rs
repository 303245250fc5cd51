//! Tests for the view-state controller.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::order;
use orders_model::{
    FieldValue, FilterNode, FilterOperator, GroupDescriptor, GroupPath, NodeId, RecordId,
    RecordStore, SortDescriptor, ViewState,
};
use orders_view::{PublishReason, RenderRow, ViewEvent, ViewStateController};

fn controller() -> ViewStateController<orders_model::Order> {
    let store = RecordStore::new(vec![
        order(1, "A", Some(10.0)),
        order(2, "B", Some(20.0)),
        order(3, "A", Some(5.0)),
    ]);
    let state = ViewState::new()
        .with_sort(SortDescriptor::asc("customerID"))
        .with_group(GroupDescriptor::new("customerID"));
    ViewStateController::new(store, state).unwrap()
}

fn group(customer: &str) -> NodeId {
    NodeId::Group(GroupPath::default().child("customerID", &FieldValue::text(customer)))
}

fn shape(controller: &ViewStateController<orders_model::Order>) -> Vec<String> {
    controller
        .render()
        .iter()
        .map(|row| match row {
            RenderRow::GroupHeader {
                depth,
                group,
                expanded,
                ..
            } => format!("{depth} group {} ({}) {}", group.value, group.count, if *expanded { "-" } else { "+" }),
            RenderRow::Record { depth, record, .. } => format!("{depth} order {}", record.order_id),
            RenderRow::Detail { depth, record } => format!("{depth} detail {}", record.order_id),
        })
        .collect()
}

#[test]
fn renders_groups_expanded_and_records_collapsed() {
    let controller = controller();
    assert_eq!(
        shape(&controller),
        [
            "0 group A (2) -",
            "1 order 1",
            "1 order 3",
            "0 group B (1) -",
            "1 order 2",
        ]
    );
    assert_eq!(controller.revision(), 0);
}

#[test]
fn toggling_changes_rendering_without_recomputing() {
    let mut controller = controller();
    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&published);
    controller.subscribe(move |publication| {
        sink.borrow_mut().push((publication.revision, publication.reason));
    });

    let before = controller.result().clone();
    controller.handle(ViewEvent::ExpandToggled(group("A"))).unwrap();
    controller.handle(ViewEvent::ExpandToggled(NodeId::Record(RecordId(2)))).unwrap();

    assert_eq!(controller.result(), &before);
    assert_eq!(
        shape(&controller),
        ["0 group A (2) +", "0 group B (1) -", "1 order 2", "1 detail 2"]
    );
    assert_eq!(
        *published.borrow(),
        [
            (1, PublishReason::ExpansionChanged),
            (2, PublishReason::ExpansionChanged),
        ]
    );
}

#[test]
fn state_change_recomputes_and_keeps_expansion() {
    let mut controller = controller();
    controller.toggle(NodeId::Record(RecordId(1)));

    let state = ViewState::new().with_filter(FilterNode::clause("freight", FilterOperator::Gte, 10.0));
    let revision = controller.handle(ViewEvent::StateChanged(state.clone())).unwrap();

    assert_eq!(revision, 2);
    assert_eq!(controller.state(), &state);
    assert_eq!(shape(&controller), ["0 order 1", "0 detail 1", "0 order 2"]);
}

#[test]
fn rejected_state_keeps_previous_view() {
    let mut controller = controller();
    let state = controller.state().clone();
    let result = controller.result().clone();

    let bad = ViewState::new().with_sort(SortDescriptor::asc("unknown"));
    assert!(controller.handle(ViewEvent::StateChanged(bad)).is_err());

    assert_eq!(controller.state(), &state);
    assert_eq!(controller.result(), &result);
    assert_eq!(controller.revision(), 0);
}

#[test]
fn set_expanded_is_idempotent() {
    let mut controller = controller();
    controller.set_expanded(group("B"), true);
    assert_eq!(controller.revision(), 0);
    controller.set_expanded(group("B"), false);
    controller.set_expanded(group("B"), false);
    assert_eq!(controller.revision(), 1);
    assert!(!controller.expansion().is_expanded(&group("B")));
}
