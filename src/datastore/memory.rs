//! In-memory document store for tests and offline runs

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::Error;

use super::query::Query;
use super::types::{Document, DocumentFields, DocumentList};
use super::Datastore;

/// A document store held entirely in memory
///
/// Clones share the same underlying collection, so a test can keep one
/// handle and give another to the code under test. The store applies the
/// same query clauses the hosted store does and can be switched into a
/// failing mode where every operation returns a write error.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatastore {
    documents: Arc<Mutex<Vec<Document>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail, or restore normal service
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, AtomicOrdering::SeqCst);
    }

    /// Rewrite a document's creation timestamp
    ///
    /// Lets tests place documents on past days.
    pub async fn backdate(&self, document_id: &str, created_at: DateTime<Utc>) {
        let mut documents = self.documents.lock().await;
        if let Some(doc) = documents.iter_mut().find(|d| d.id == document_id) {
            doc.created_at = created_at;
        }
    }

    /// Number of documents currently stored
    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }

    fn check_available(&self) -> Result<(), Error> {
        if self.failing.load(AtomicOrdering::SeqCst) {
            return Err(Error::Api {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }

    /// Value of an attribute as it would appear to a query clause
    fn attribute_value(doc: &Document, attribute: &str) -> Option<Value> {
        match attribute {
            "$id" => Some(Value::String(doc.id.clone())),
            "$createdAt" => Some(Value::String(doc.created_at.to_rfc3339())),
            "$updatedAt" => Some(Value::String(doc.updated_at.to_rfc3339())),
            _ => doc.fields.get(attribute).cloned(),
        }
    }

    fn compare(left: &Value, right: &Value) -> Option<Ordering> {
        match (left, right) {
            (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
            (Value::Number(l), Value::Number(r)) => {
                let l = l.as_f64()?;
                let r = r.as_f64()?;
                l.partial_cmp(&r)
            }
            _ => None,
        }
    }

    fn matches(doc: &Document, query: &Query) -> bool {
        match query {
            Query::Equal { attribute, value } => {
                Self::attribute_value(doc, attribute).as_ref() == Some(value)
            }
            Query::GreaterThanEqual { attribute, value } => Self::attribute_value(doc, attribute)
                .and_then(|v| Self::compare(&v, value))
                .map(Ordering::is_ge)
                .unwrap_or(false),
            Query::LessThan { attribute, value } => Self::attribute_value(doc, attribute)
                .and_then(|v| Self::compare(&v, value))
                .map(Ordering::is_lt)
                .unwrap_or(false),
            _ => true,
        }
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn create(&self, fields: &DocumentFields) -> Result<Document, Error> {
        self.check_available()?;

        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            collection_id: None,
            database_id: None,
            permissions: Vec::new(),
            fields: fields.clone(),
        };

        let mut documents = self.documents.lock().await;
        documents.push(doc.clone());
        Ok(doc)
    }

    async fn list(&self, queries: &[Query]) -> Result<DocumentList, Error> {
        self.check_available()?;

        let documents = self.documents.lock().await;
        let mut matched: Vec<Document> = documents
            .iter()
            .filter(|doc| queries.iter().all(|q| Self::matches(doc, q)))
            .cloned()
            .collect();

        for query in queries {
            match query {
                Query::OrderAsc { attribute } => matched.sort_by(|a, b| {
                    let left = Self::attribute_value(a, attribute);
                    let right = Self::attribute_value(b, attribute);
                    match (left, right) {
                        (Some(l), Some(r)) => {
                            Self::compare(&l, &r).unwrap_or(Ordering::Equal)
                        }
                        _ => Ordering::Equal,
                    }
                }),
                Query::OrderDesc { attribute } => matched.sort_by(|a, b| {
                    let left = Self::attribute_value(a, attribute);
                    let right = Self::attribute_value(b, attribute);
                    match (left, right) {
                        (Some(l), Some(r)) => {
                            Self::compare(&r, &l).unwrap_or(Ordering::Equal)
                        }
                        _ => Ordering::Equal,
                    }
                }),
                _ => {}
            }
        }

        // total counts matches, not the window
        let total = matched.len() as u64;

        let offset = queries
            .iter()
            .find_map(|q| match q {
                Query::Offset(n) => Some(*n as usize),
                _ => None,
            })
            .unwrap_or(0);
        let limit = queries.iter().find_map(|q| match q {
            Query::Limit(n) => Some(*n as usize),
            _ => None,
        });

        let mut window: Vec<Document> = matched.into_iter().skip(offset).collect();
        if let Some(limit) = limit {
            window.truncate(limit);
        }

        Ok(DocumentList {
            total,
            documents: window,
        })
    }

    async fn update(&self, document_id: &str, fields: &DocumentFields) -> Result<Document, Error> {
        self.check_available()?;

        let mut documents = self.documents.lock().await;
        let doc = documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| Error::not_found(document_id))?;

        for (key, value) in fields {
            doc.fields.insert(key.clone(), value.clone());
        }
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn delete(&self, document_id: &str) -> Result<(), Error> {
        self.check_available()?;

        let mut documents = self.documents.lock().await;
        let before = documents.len();
        documents.retain(|d| d.id != document_id);
        if documents.len() == before {
            return Err(Error::not_found(document_id));
        }
        Ok(())
    }
}
