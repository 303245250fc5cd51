use std::sync::Arc;

use crate::schema::{Record, RecordId};

/// An immutable, ordered collection of records loaded once at startup.
///
/// Clones share the same backing slice; nothing hands out `&mut` access to
/// the records, so store order is fixed for the lifetime of the value.
#[derive(Debug)]
pub struct RecordStore<R> {
    records: Arc<[Arc<R>]>,
}

impl<R> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R> RecordStore<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn records(&self) -> &[Arc<R>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter().map(|record| &**record)
    }
}

impl<R: Record> RecordStore<R> {
    pub fn get(&self, id: RecordId) -> Option<&Arc<R>> {
        self.records.iter().find(|record| record.id() == id)
    }
}

impl<R> FromIterator<R> for RecordStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
