#![deny(unsafe_code)]

//! Export of sales orders to a spreadsheet file (CSV of the whole store) and
//! a document file (one page rendered as a text table).

pub mod document;
pub mod error;
pub mod format;
pub mod handle;
pub mod spreadsheet;

pub use document::{DocumentExport, DocumentHandle};
pub use error::{ExportError, Result};
pub use format::{format_cell, raw_cell};
pub use handle::{ExportHandle, ExportKind, ExportReport, Exporter, export_store, scoped};
pub use spreadsheet::{SpreadsheetExport, SpreadsheetHandle};
