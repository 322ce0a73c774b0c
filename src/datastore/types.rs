//! Wire types for the document store

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Field payload of a document: attribute name to JSON value
pub type DocumentFields = Map<String, Value>;

/// A document as the store returns it: system fields plus the field payload
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Store-assigned opaque identifier
    #[serde(rename = "$id")]
    pub id: String,

    /// Insertion timestamp, set by the store
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,

    /// Last-write timestamp, set by the store
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,

    #[serde(rename = "$collectionId", default)]
    pub collection_id: Option<String>,

    #[serde(rename = "$databaseId", default)]
    pub database_id: Option<String>,

    #[serde(rename = "$permissions", default)]
    pub permissions: Vec<String>,

    /// Everything that is not a system field
    #[serde(flatten)]
    pub fields: DocumentFields,
}

impl Document {
    /// Look up a string field
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Look up an integer field
    pub fn field_i64(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }
}

/// A page of documents plus the total match count
///
/// `total` counts every document matching the filters, not just the ones
/// inside the current limit/offset window.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Document>,
}
