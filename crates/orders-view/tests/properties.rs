//! Property tests for the data view processor.

mod common;

use std::collections::BTreeSet;

use common::{ids, order, store, store_ids};
use orders_model::{
    FilterNode, FilterOperator, GroupDescriptor, Order, SortDescriptor, SortDirection, ViewState,
};
use orders_view::materialize_store;
use proptest::prelude::*;

const CUSTOMERS: &[&str] = &["ALFKI", "alfki", "BONAP", "HANAR", "VINET"];

fn arb_orders() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec(
        (0..CUSTOMERS.len(), prop::option::of(0u8..20)),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(pos, (customer, freight))| {
                order(pos as i64 + 1, CUSTOMERS[customer], freight.map(f64::from))
            })
            .collect()
    })
}

fn arb_direction() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)]
}

fn arb_state() -> impl Strategy<Value = ViewState> {
    (
        prop::option::of(0u8..20),
        prop::option::of(arb_direction()),
        any::<bool>(),
        prop::option::of((0usize..50, 0usize..25)),
    )
        .prop_map(|(threshold, dir, grouped, page)| {
            let mut state = ViewState::new();
            if let Some(threshold) = threshold {
                state = state.with_filter(FilterNode::clause(
                    "freight",
                    FilterOperator::Gte,
                    f64::from(threshold),
                ));
            }
            if let Some(dir) = dir {
                state = state.with_sort(SortDescriptor {
                    field: "freight".to_string(),
                    dir,
                });
            }
            if grouped {
                state = state.with_group(GroupDescriptor::new("customerID"));
            }
            if let Some((skip, take)) = page {
                state = state.with_page(skip, take);
            }
            state
        })
}

proptest! {
    #[test]
    fn materialize_is_deterministic(orders in arb_orders(), state in arb_state()) {
        let store = store(orders);
        let first = materialize_store(&store, &state).unwrap();
        let second = materialize_store(&store, &state).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn store_is_left_untouched(orders in arb_orders(), state in arb_state()) {
        let store = store(orders);
        let before = store_ids(&store);
        materialize_store(&store, &state).unwrap();
        prop_assert_eq!(store_ids(&store), before);
    }

    #[test]
    fn equal_keys_keep_store_order(orders in arb_orders(), dir in arb_direction()) {
        let store = store(orders);
        let state = ViewState::new().with_sort(SortDescriptor { field: "freight".to_string(), dir });
        let result = materialize_store(&store, &state).unwrap();
        let records = result.records();
        for pair in records.windows(2) {
            if pair[0].freight == pair[1].freight {
                prop_assert!(pair[0].order_id < pair[1].order_id);
            }
        }
        // Missing first, whatever the direction.
        let first_present = records.iter().position(|o| o.freight.is_some()).unwrap_or(records.len());
        prop_assert!(records[first_present..].iter().all(|o| o.freight.is_some()));
    }

    #[test]
    fn paging_is_a_window_of_the_unpaged_view(
        orders in arb_orders(),
        skip in 0usize..50,
        take in 0usize..25,
    ) {
        let store = store(orders);
        let base = ViewState::new().with_sort(SortDescriptor::asc("freight"));
        let full = materialize_store(&store, &base).unwrap();
        let paged = materialize_store(&store, &base.clone().with_page(skip, take)).unwrap();

        prop_assert_eq!(paged.total, full.total);
        let expected: Vec<i64> = ids(&full).into_iter().skip(skip).take(take).collect();
        prop_assert_eq!(ids(&paged), expected);
    }

    #[test]
    fn group_counts_cover_every_filtered_record(orders in arb_orders(), threshold in 0u8..20) {
        let store = store(orders);
        let state = ViewState::new()
            .with_filter(FilterNode::clause("freight", FilterOperator::Gte, f64::from(threshold)))
            .with_group(GroupDescriptor::new("customerID"));
        let result = materialize_store(&store, &state).unwrap();

        let counted: usize = result.groups().iter().map(|group| group.count).sum();
        prop_assert_eq!(counted, result.record_count);
        prop_assert!(result.groups().iter().all(|group| group.count > 0));

        let values: BTreeSet<_> = result.groups().iter().map(|group| group.value.clone()).collect();
        prop_assert_eq!(values.len(), result.groups().len());
    }
}
