//! The sales order record shown in the grid.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schema::{FieldDef, FieldSchema, Record, RecordId};
use crate::value::{FieldType, FieldValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipAddress {
    pub street: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// One line item of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(rename = "productID")]
    pub product_id: i64,
    pub unit_price: f64,
    pub quantity: i64,
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "orderID")]
    pub order_id: i64,
    #[serde(rename = "customerID")]
    pub customer_id: String,
    #[serde(rename = "employeeID")]
    pub employee_id: Option<i64>,
    pub order_date: Option<NaiveDateTime>,
    pub required_date: Option<NaiveDateTime>,
    pub shipped_date: Option<NaiveDateTime>,
    pub ship_via: Option<i64>,
    pub freight: Option<f64>,
    pub ship_name: String,
    pub ship_address: ShipAddress,
    #[serde(default)]
    pub details: Vec<OrderDetail>,
}

const ORDER_FIELDS: &[FieldDef] = &[
    FieldDef::new("orderID", FieldType::Number),
    FieldDef::new("customerID", FieldType::Text),
    FieldDef::new("employeeID", FieldType::Number),
    FieldDef::new("orderDate", FieldType::DateTime),
    FieldDef::new("requiredDate", FieldType::DateTime),
    FieldDef::new("shippedDate", FieldType::DateTime),
    FieldDef::new("shipVia", FieldType::Number),
    FieldDef::new("freight", FieldType::Number),
    FieldDef::new("shipName", FieldType::Text),
    FieldDef::new("shipAddress.street", FieldType::Text),
    FieldDef::new("shipAddress.city", FieldType::Text),
    FieldDef::new("shipAddress.region", FieldType::Text),
    FieldDef::new("shipAddress.postalCode", FieldType::Text),
    FieldDef::new("shipAddress.country", FieldType::Text),
];

impl Order {
    /// Sum of `unit_price * quantity * (1 - discount)` over the line items.
    pub fn detail_total(&self) -> f64 {
        self.details
            .iter()
            .map(|d| d.unit_price * d.quantity as f64 * (1.0 - d.discount))
            .sum()
    }
}

impl Record for Order {
    fn schema() -> FieldSchema {
        FieldSchema::new(ORDER_FIELDS)
    }

    fn id(&self) -> RecordId {
        RecordId(self.order_id)
    }

    fn value(&self, field: &str) -> FieldValue {
        match field {
            "orderID" => FieldValue::from(self.order_id),
            "customerID" => FieldValue::text(&self.customer_id),
            "employeeID" => FieldValue::from(self.employee_id),
            "orderDate" => FieldValue::from(self.order_date),
            "requiredDate" => FieldValue::from(self.required_date),
            "shippedDate" => FieldValue::from(self.shipped_date),
            "shipVia" => FieldValue::from(self.ship_via),
            "freight" => FieldValue::from(self.freight),
            "shipName" => FieldValue::text(&self.ship_name),
            "shipAddress.street" => FieldValue::text(&self.ship_address.street),
            "shipAddress.city" => FieldValue::text(&self.ship_address.city),
            "shipAddress.region" => FieldValue::from(self.ship_address.region.clone()),
            "shipAddress.postalCode" => FieldValue::text(&self.ship_address.postal_code),
            "shipAddress.country" => FieldValue::text(&self.ship_address.country),
            _ => FieldValue::Missing,
        }
    }
}
