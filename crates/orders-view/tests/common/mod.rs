#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use orders_model::{Order, Record, RecordStore, ShipAddress, ViewResult};

pub fn order(id: i64, customer: &str, freight: Option<f64>) -> Order {
    Order {
        order_id: id,
        customer_id: customer.to_string(),
        employee_id: None,
        order_date: None,
        required_date: None,
        shipped_date: None,
        ship_via: None,
        freight,
        ship_name: String::new(),
        ship_address: ShipAddress::default(),
        details: Vec::new(),
    }
}

pub fn dated(id: i64, order_date: Option<NaiveDateTime>) -> Order {
    Order {
        order_date,
        ..order(id, "ALFKI", None)
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid test date")
}

pub fn store(orders: Vec<Order>) -> RecordStore<Order> {
    RecordStore::new(orders)
}

pub fn ids(result: &ViewResult<Order>) -> Vec<i64> {
    result.record_ids().into_iter().map(|id| id.0).collect()
}

pub fn store_ids(store: &RecordStore<Order>) -> Vec<i64> {
    store.iter().map(|order| order.id().0).collect()
}
