use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A flat, schemaless record as stored in a collection.
pub type Document = Map<String, Value>;

/// Field holding the store-generated identifier of every document.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Bookings,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Bookings => "bookings",
        }
    }
}

/// Conjunction of field equalities. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Filter::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::all().and(field, value)
    }

    pub fn by_id(id: &str) -> Self {
        Filter::eq(ID_FIELD, id)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns the identifier when the filter is a single `_id` equality.
    pub fn id_lookup(&self) -> Option<&str> {
        match self.conditions.as_slice() {
            [(field, Value::String(id))] if field == ID_FIELD => Some(id),
            _ => None,
        }
    }
}

pub fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn is_valid_document_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOneResult {
    pub fn new(inserted_id: String) -> Self {
        InsertOneResult {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    pub fn matched(matched_count: u64, modified_count: u64) -> Self {
        UpdateResult {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn upserted(id: String) -> Self {
        UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        DeleteResult {
            acknowledged: true,
            deleted_count,
        }
    }
}
