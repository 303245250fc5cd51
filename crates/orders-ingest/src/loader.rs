//! Order loading and startup normalization.
//!
//! Raw orders carry dates as text. Each date is parsed against the configured
//! formats through the [`LocaleContext`]; a value that parses under none of
//! them becomes a missing field and is reported as a [`DegradedField`] rather
//! than failing the load.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info, warn};

use orders_model::{Order, OrderDetail, RecordStore, ShipAddress};

use crate::error::{IngestError, ParseError, Result};
use crate::locale::LocaleContext;

/// `yyyy-mm-dd hh:mm:ss.SSS` first, then ISO 8601 variants.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.3f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d",
];

const SAMPLE_ORDERS: &str = include_str!("../resources/orders.json");

/// What to do with an order whose `shippedDate` is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShippedDatePolicy {
    /// Leave it missing.
    Keep,
    /// Use the order date.
    #[default]
    DeriveFromOrderDate,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub date_formats: Vec<String>,
    pub shipped_date: ShippedDatePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| (*f).to_string()).collect(),
            shipped_date: ShippedDatePolicy::default(),
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn with_shipped_date(mut self, policy: ShippedDatePolicy) -> Self {
        self.shipped_date = policy;
        self
    }

    #[must_use]
    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        self.date_formats = formats;
        self
    }
}

/// A field that failed to parse and was loaded as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedField {
    pub order_id: i64,
    pub field: &'static str,
    pub error: ParseError,
}

#[derive(Debug, Clone)]
pub struct LoadedOrders {
    pub store: RecordStore<Order>,
    pub degraded: Vec<DegradedField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrder {
    #[serde(rename = "orderID")]
    order_id: i64,
    #[serde(rename = "customerID", default)]
    customer_id: Option<String>,
    #[serde(rename = "employeeID", default)]
    employee_id: Option<RawNumber>,
    #[serde(default)]
    order_date: Option<String>,
    #[serde(default)]
    required_date: Option<String>,
    #[serde(default)]
    shipped_date: Option<String>,
    #[serde(default)]
    ship_via: Option<RawNumber>,
    #[serde(default)]
    freight: Option<RawNumber>,
    #[serde(default)]
    ship_name: Option<String>,
    #[serde(default)]
    ship_address: Option<ShipAddress>,
    #[serde(default)]
    details: Vec<OrderDetail>,
}

struct Normalizer<'a> {
    locale: &'a LocaleContext,
    options: &'a LoadOptions,
    degraded: Vec<DegradedField>,
}

impl Normalizer<'_> {
    fn date(
        &mut self,
        order_id: i64,
        field: &'static str,
        raw: Option<&str>,
    ) -> Option<NaiveDateTime> {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
        match parse_date_any(self.locale, raw, &self.options.date_formats) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(order_id, field, %error, "date treated as missing");
                self.degraded.push(DegradedField {
                    order_id,
                    field,
                    error,
                });
                None
            }
        }
    }

    fn number(&mut self, order_id: i64, field: &'static str, raw: Option<RawNumber>) -> Option<f64> {
        let parsed = match raw? {
            RawNumber::Number(value) => Ok(value),
            RawNumber::Text(text) if text.trim().is_empty() => return None,
            RawNumber::Text(text) => self.locale.parse_number(&text),
        };
        match parsed {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(order_id, field, %error, "number treated as missing");
                self.degraded.push(DegradedField {
                    order_id,
                    field,
                    error,
                });
                None
            }
        }
    }

    fn integer(
        &mut self,
        order_id: i64,
        field: &'static str,
        raw: Option<RawNumber>,
    ) -> Option<i64> {
        let value = self.number(order_id, field, raw)?;
        if value.fract() == 0.0 {
            Some(value as i64)
        } else {
            self.degraded.push(DegradedField {
                order_id,
                field,
                error: ParseError::Number {
                    value: value.to_string(),
                },
            });
            None
        }
    }

    fn order(&mut self, raw: RawOrder) -> Order {
        let id = raw.order_id;
        let order_date = self.date(id, "orderDate", raw.order_date.as_deref());
        let required_date = self.date(id, "requiredDate", raw.required_date.as_deref());
        let mut shipped_date = self.date(id, "shippedDate", raw.shipped_date.as_deref());
        if shipped_date.is_none() && self.options.shipped_date == ShippedDatePolicy::DeriveFromOrderDate
        {
            shipped_date = order_date;
        }
        Order {
            order_id: id,
            customer_id: raw.customer_id.unwrap_or_default(),
            employee_id: self.integer(id, "employeeID", raw.employee_id),
            order_date,
            required_date,
            shipped_date,
            ship_via: self.integer(id, "shipVia", raw.ship_via),
            freight: self.number(id, "freight", raw.freight),
            ship_name: raw.ship_name.unwrap_or_default(),
            ship_address: raw.ship_address.unwrap_or_default(),
            details: raw.details,
        }
    }
}

/// Try each format in turn; the error of the last attempt is returned.
pub fn parse_date_any(
    locale: &LocaleContext,
    value: &str,
    formats: &[String],
) -> std::result::Result<NaiveDateTime, ParseError> {
    let mut last = ParseError::Date {
        value: value.to_string(),
        format: String::new(),
    };
    for format in formats {
        match locale.parse_date(value, format) {
            Ok(parsed) => return Ok(parsed),
            Err(error) => last = error,
        }
    }
    Err(last)
}

/// Load orders from a JSON array.
pub fn load_orders_from_str(
    json: &str,
    locale: &LocaleContext,
    options: &LoadOptions,
) -> Result<LoadedOrders> {
    let raw: Vec<RawOrder> = serde_json::from_str(json)?;
    let mut normalizer = Normalizer {
        locale,
        options,
        degraded: Vec::new(),
    };
    let orders: Vec<Order> = raw.into_iter().map(|raw| normalizer.order(raw)).collect();
    if !normalizer.degraded.is_empty() {
        warn!(
            degraded_fields = normalizer.degraded.len(),
            "some order fields could not be parsed and were loaded as missing"
        );
    }
    info!(record_count = orders.len(), locale = %locale.language(), "orders loaded");
    Ok(LoadedOrders {
        store: RecordStore::new(orders),
        degraded: normalizer.degraded,
    })
}

pub fn load_orders(
    path: &Path,
    locale: &LocaleContext,
    options: &LoadOptions,
) -> Result<LoadedOrders> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    load_orders_from_str(&json, locale, options)
}

/// The sales orders bundled with the crate.
pub fn load_sample_orders(locale: &LocaleContext, options: &LoadOptions) -> Result<LoadedOrders> {
    load_orders_from_str(SAMPLE_ORDERS, locale, options)
}
