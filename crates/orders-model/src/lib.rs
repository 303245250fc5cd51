#![deny(unsafe_code)]

pub mod columns;
pub mod descriptor;
pub mod error;
pub mod order;
pub mod parse;
pub mod result;
pub mod schema;
pub mod store;
pub mod value;

pub use columns::{ColumnSpec, DisplayFormat, display_columns, find_column, order_columns};
pub use descriptor::{
    AggregateDescriptor, AggregateKind, CompositeFilter, FilterClause, FilterLogic, FilterNode,
    FilterOperator, GroupDescriptor, PageDescriptor, SortDescriptor, SortDirection, ViewState,
};
pub use error::{ConfigurationError, Result};
pub use order::{Order, OrderDetail, ShipAddress};
pub use parse::{check_filterable, parse_filter_clause, parse_group, parse_sort};
pub use result::{AggregateValues, GroupItems, GroupNode, GroupPath, NodeId, ViewData, ViewResult};
pub use schema::{FieldDef, FieldSchema, Record, RecordId};
pub use store::RecordStore;
pub use value::{FieldType, FieldValue, parse_iso_datetime};
