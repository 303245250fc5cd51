//! Scoped acquisition of export destinations.
//!
//! An [`Exporter`] describes where output goes; [`Exporter::acquire`] opens
//! it and returns a handle. The handle receives records through
//! [`ExportHandle::save`] and is closed with [`ExportHandle::release`],
//! which moves the finished output onto the destination path. Until then
//! output goes to a temporary file next to the destination; dropping a
//! handle without releasing it discards that file and leaves the
//! destination untouched.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use orders_model::{Order, RecordStore};

use crate::error::{ExportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Spreadsheet,
    Document,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Spreadsheet => "spreadsheet",
            ExportKind::Document => "document",
        }
    }
}

/// What a released handle wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub kind: ExportKind,
    pub path: PathBuf,
    pub rows: usize,
}

pub trait Exporter {
    type Handle: ExportHandle;

    fn acquire(&self) -> Result<Self::Handle>;
}

pub trait ExportHandle {
    /// Write the export of `store`; returns the number of record rows.
    fn save(&mut self, store: &RecordStore<Order>) -> Result<usize>;

    fn release(self) -> Result<ExportReport>;
}

/// Open a temporary file in the directory of `path`.
pub(crate) fn stage(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir).map_err(|source| ExportError::io(path, source))
}

/// Replace `path` with the staged file.
pub(crate) fn commit(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .persist(path)
        .map(drop)
        .map_err(|error| ExportError::io(path, error.error))
}

/// Acquire a handle, run `work` with it, then release it.
///
/// The handle is released only when `work` succeeds.
pub fn scoped<E, T, F>(exporter: &E, work: F) -> Result<(T, ExportReport)>
where
    E: Exporter,
    F: FnOnce(&mut E::Handle) -> Result<T>,
{
    let mut handle = exporter.acquire()?;
    let value = work(&mut handle)?;
    let report = handle.release()?;
    Ok((value, report))
}

/// Acquire, save `store` once, release.
pub fn export_store<E: Exporter>(exporter: &E, store: &RecordStore<Order>) -> Result<ExportReport> {
    scoped(exporter, |handle| handle.save(store)).map(|(_, report)| report)
}
