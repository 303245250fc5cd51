#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod locale;

pub use error::{IngestError, ParseError, Result};
pub use loader::{
    DEFAULT_DATE_FORMATS, DegradedField, LoadOptions, LoadedOrders, ShippedDatePolicy,
    load_orders, load_orders_from_str, load_sample_orders, parse_date_any,
};
pub use locale::{DateStyle, Locale, LocaleContext};
