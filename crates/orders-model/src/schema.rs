use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::value::{FieldType, FieldValue};

/// A named, typed field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FieldDef {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type }
    }
}

/// The fields a record type exposes to filter, sort and group descriptors.
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    fields: &'static [FieldDef],
}

impl FieldSchema {
    pub const fn new(fields: &'static [FieldDef]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    pub fn get(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Look up a field, failing with [`ConfigurationError::UnknownField`].
    pub fn require(&self, name: &str) -> Result<&'static FieldDef> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownField(name.to_string()))
    }
}

/// Stable identity of a record within a store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A row type the view pipeline can project.
///
/// Field lookups go through [`Record::value`] by schema name; names that
/// are not in [`Record::schema`] are rejected before `value` is called.
pub trait Record {
    fn schema() -> FieldSchema;

    fn id(&self) -> RecordId;

    fn value(&self, field: &str) -> FieldValue;
}
