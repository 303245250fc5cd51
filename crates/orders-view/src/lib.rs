#![deny(unsafe_code)]

//! Filter, sort, group and page a record store into a view, and keep that
//! view in step with user events.

mod aggregate;
pub mod controller;
pub mod expansion;
mod filter;
mod group;
mod page;
pub mod processor;
mod sort;

pub use controller::{Publication, PublishReason, RenderRow, ViewEvent, ViewStateController};
pub use expansion::ExpansionState;
pub use processor::{materialize, materialize_store, validate};
pub use sort::compare_values;
