//! Document store access
//!
//! [`Datastore`] is the seam between record management and the hosted
//! collection. [`DatastoreClient`] talks to the real store over HTTP;
//! [`MemoryDatastore`] backs tests and offline runs.

pub mod client;
pub mod memory;
pub mod query;
pub mod types;

pub use client::DatastoreClient;
pub use memory::MemoryDatastore;
pub use query::Query;
pub use types::{Document, DocumentFields, DocumentList};

use async_trait::async_trait;

use crate::error::Error;

/// Operations a document collection supports
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Create a document with a store-assigned id
    async fn create(&self, fields: &DocumentFields) -> Result<Document, Error>;

    /// List documents matching the given queries
    async fn list(&self, queries: &[Query]) -> Result<DocumentList, Error>;

    /// Overwrite the given fields of an existing document
    async fn update(&self, document_id: &str, fields: &DocumentFields) -> Result<Document, Error>;

    /// Remove a document
    async fn delete(&self, document_id: &str) -> Result<(), Error>;
}
