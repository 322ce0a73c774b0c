//! HTTP client for an Appwrite-compatible document store

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::config::StoreConfig;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

use super::query::Query;
use super::types::{Document, DocumentFields, DocumentList};
use super::Datastore;

/// Client for one collection of the hosted store
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct DatastoreClient {
    config: StoreConfig,
    http: Client,
}

impl DatastoreClient {
    /// Create a new DatastoreClient over an existing HTTP client
    pub fn new(config: StoreConfig, http: Client) -> Self {
        Self { config, http }
    }

    /// Build a client with its own HTTP client, honoring the configured timeout
    pub fn from_config(config: StoreConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self::new(config, http))
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint, self.config.database_id, self.config.collection_id
        )
    }

    fn document_url(&self, document_id: &str) -> String {
        format!("{}/{}", self.documents_url(), document_id)
    }

    fn fetch<'a>(&'a self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        builder
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
    }

    /// Map a 404 from a single-document route to a NotFound error
    fn map_missing(err: Error, document_id: &str) -> Error {
        match err {
            Error::Api { status, .. } if status == StatusCode::NOT_FOUND => {
                Error::not_found(document_id)
            }
            other => other,
        }
    }
}

#[async_trait]
impl Datastore for DatastoreClient {
    async fn create(&self, fields: &DocumentFields) -> Result<Document, Error> {
        log::debug!("creating document in {}", self.config.collection_id);

        let body = json!({
            "documentId": "unique()",
            "data": fields,
        });

        self.fetch(Fetch::post(&self.http, &self.documents_url()))
            .json(&body)?
            .execute()
            .await
    }

    async fn list(&self, queries: &[Query]) -> Result<DocumentList, Error> {
        log::debug!(
            "listing documents in {} ({} queries)",
            self.config.collection_id,
            queries.len()
        );

        let mut request = self.fetch(Fetch::get(&self.http, &self.documents_url()));
        for query in queries {
            request = request.query("queries[]", &query.to_json());
        }
        request.execute().await
    }

    async fn update(&self, document_id: &str, fields: &DocumentFields) -> Result<Document, Error> {
        log::debug!("updating document {}", document_id);

        let body = json!({ "data": fields });

        self.fetch(Fetch::patch(&self.http, &self.document_url(document_id)))
            .json(&body)?
            .execute()
            .await
            .map_err(|err| Self::map_missing(err, document_id))
    }

    async fn delete(&self, document_id: &str) -> Result<(), Error> {
        log::debug!("deleting document {}", document_id);

        self.fetch(Fetch::delete(&self.http, &self.document_url(document_id)))
            .execute_empty()
            .await
            .map_err(|err| Self::map_missing(err, document_id))
    }
}
