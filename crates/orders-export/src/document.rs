//! Document export: one page of the store as a titled text table.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::{Cell, CellAlignment, Table};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use orders_ingest::LocaleContext;
use orders_model::{
    ColumnSpec, FieldType, Order, PageDescriptor, Record, RecordStore, ViewState, display_columns,
    order_columns,
};
use orders_view::materialize;

use crate::error::{ExportError, Result};
use crate::format::format_cell;
use crate::handle::{ExportHandle, ExportKind, ExportReport, Exporter, commit, stage};

const DEFAULT_MARGIN: usize = 2;

/// Renders the page window `(skip, take)` of the unfiltered, unsorted store.
#[derive(Debug, Clone)]
pub struct DocumentExport {
    path: PathBuf,
    locale: LocaleContext,
    window: PageDescriptor,
    margin: usize,
    columns: Vec<ColumnSpec>,
}

impl DocumentExport {
    pub fn new(path: impl Into<PathBuf>, locale: LocaleContext, window: PageDescriptor) -> Self {
        Self {
            path: path.into(),
            locale,
            window,
            margin: DEFAULT_MARGIN,
            columns: display_columns(order_columns()),
        }
    }

    /// Left margin in characters; also the number of blank lines above and
    /// below the table.
    #[must_use]
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the document text for `store`.
    pub fn render(&self, store: &RecordStore<Order>) -> Result<(String, usize)> {
        let state = ViewState {
            page: Some(self.window),
            ..ViewState::default()
        };
        let result = materialize(store.records(), &state)?;
        let records = result.records();

        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        table.set_header(self.columns.iter().map(|column| column.title));
        // Numbers align right in the body only; headers stay left.
        for order in &records {
            table.add_row(self.columns.iter().map(|column| {
                let cell = Cell::new(format_cell(&order.value(column.field), column, &self.locale));
                if column.field_type == FieldType::Number {
                    cell.set_alignment(CellAlignment::Right)
                } else {
                    cell
                }
            }));
        }

        let indent = " ".repeat(self.margin);
        let page_number = match self.window.take {
            0 => 1,
            take => self.window.skip / take + 1,
        };
        let mut lines = Vec::new();
        lines.extend(std::iter::repeat_n(String::new(), self.margin));
        lines.push(format!("{indent}{}", self.locale.message("export.documentTitle")));
        lines.push(String::new());
        lines.extend(table.lines().map(|line| format!("{indent}{line}")));
        lines.push(String::new());
        let page_number = page_number.to_string();
        lines.push(format!(
            "{indent}{}",
            self.locale
                .format_message("export.page", &[page_number.as_str()])
        ));
        lines.extend(std::iter::repeat_n(String::new(), self.margin));

        let mut text = lines.join("\n");
        text.push('\n');
        Ok((text, records.len()))
    }
}

impl Exporter for DocumentExport {
    type Handle = DocumentHandle;

    fn acquire(&self) -> Result<DocumentHandle> {
        let file = stage(&self.path)?;
        debug!(
            path = %self.path.display(),
            skip = self.window.skip,
            take = self.window.take,
            "document opened"
        );
        Ok(DocumentHandle {
            export: self.clone(),
            writer: BufWriter::new(file),
            rows: 0,
        })
    }
}

pub struct DocumentHandle {
    export: DocumentExport,
    writer: BufWriter<NamedTempFile>,
    rows: usize,
}

impl ExportHandle for DocumentHandle {
    fn save(&mut self, store: &RecordStore<Order>) -> Result<usize> {
        let (text, rows) = self.export.render(store)?;
        self.writer
            .write_all(text.as_bytes())
            .map_err(|source| ExportError::io(&self.export.path, source))?;
        self.rows += rows;
        Ok(rows)
    }

    fn release(self) -> Result<ExportReport> {
        let staged = self
            .writer
            .into_inner()
            .map_err(|error| ExportError::io(&self.export.path, error.into_error()))?;
        commit(staged, &self.export.path)?;
        info!(path = %self.export.path.display(), rows = self.rows, "document exported");
        Ok(ExportReport {
            kind: ExportKind::Document,
            path: self.export.path,
            rows: self.rows,
        })
    }
}
