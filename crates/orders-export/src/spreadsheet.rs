//! Spreadsheet export: the whole record store as CSV.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use tempfile::NamedTempFile;

use orders_model::{ColumnSpec, Order, Record, RecordStore, order_columns};

use crate::error::{ExportError, Result};
use crate::format::raw_cell;
use crate::handle::{ExportHandle, ExportKind, ExportReport, Exporter, commit, stage};

/// Writes every record of the store, ignoring the current view.
#[derive(Debug, Clone)]
pub struct SpreadsheetExport {
    path: PathBuf,
    columns: Vec<ColumnSpec>,
}

impl SpreadsheetExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: order_columns().to_vec(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for SpreadsheetExport {
    type Handle = SpreadsheetHandle;

    fn acquire(&self) -> Result<SpreadsheetHandle> {
        let file = stage(&self.path)?;
        debug!(path = %self.path.display(), staged = %file.path().display(), "spreadsheet opened");
        Ok(SpreadsheetHandle {
            path: self.path.clone(),
            columns: self.columns.clone(),
            writer: csv::Writer::from_writer(file),
            header_written: false,
            rows: 0,
        })
    }
}

pub struct SpreadsheetHandle {
    path: PathBuf,
    columns: Vec<ColumnSpec>,
    writer: csv::Writer<NamedTempFile>,
    header_written: bool,
    rows: usize,
}

impl ExportHandle for SpreadsheetHandle {
    fn save(&mut self, store: &RecordStore<Order>) -> Result<usize> {
        if !self.header_written {
            self.writer
                .write_record(self.columns.iter().map(|column| column.title))?;
            self.header_written = true;
        }
        for order in store.iter() {
            let row: Vec<String> = self
                .columns
                .iter()
                .map(|column| raw_cell(&order.value(column.field)))
                .collect();
            self.writer.write_record(&row)?;
        }
        self.rows += store.len();
        Ok(store.len())
    }

    fn release(self) -> Result<ExportReport> {
        let staged = self
            .writer
            .into_inner()
            .map_err(|error| ExportError::io(&self.path, error.into_error()))?;
        commit(staged, &self.path)?;
        info!(path = %self.path.display(), rows = self.rows, "spreadsheet exported");
        Ok(ExportReport {
            kind: ExportKind::Spreadsheet,
            path: self.path,
            rows: self.rows,
        })
    }
}
