//! PAN applicant registry client
//!
//! A client for managing PAN-card applicant records held in a hosted
//! document collection: validated creation with Aadhaar de-duplication,
//! in-place editing behind an explicit edit mode, deletion behind a
//! confirmation gate, and client-side search, pagination, and metrics
//! over a local mirror of the collection.

pub mod config;
pub mod datastore;
pub mod error;
pub mod fetch;
pub mod records;

use reqwest::Client;

use crate::config::StoreConfig;
use crate::datastore::DatastoreClient;
use crate::error::Error;
use crate::records::RecordManager;

/// The main entry point for the registry client
pub struct PanRegistry {
    /// Store connection settings
    pub config: StoreConfig,
    /// HTTP client shared by everything this instance hands out
    pub http_client: Client,
}

impl PanRegistry {
    /// Create a new registry client
    ///
    /// # Example
    ///
    /// ```
    /// use pan_registry::PanRegistry;
    /// use pan_registry::config::StoreConfig;
    ///
    /// let config = StoreConfig::new(
    ///     "https://store.example.com/v1",
    ///     "project-id",
    ///     "api-key",
    ///     "main",
    ///     "records",
    /// );
    /// let registry = PanRegistry::new(config).expect("client builds");
    /// let manager = registry.manager();
    /// ```
    pub fn new(config: StoreConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create a registry client from `PANREG_*` environment variables
    pub fn from_env() -> Result<Self, Error> {
        Self::new(StoreConfig::from_env()?)
    }

    /// A datastore client for the configured collection
    pub fn datastore(&self) -> DatastoreClient {
        DatastoreClient::new(self.config.clone(), self.http_client.clone())
    }

    /// A record manager over the configured collection
    pub fn manager(&self) -> RecordManager<DatastoreClient> {
        RecordManager::new(self.datastore())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use crate::datastore::{Datastore, DatastoreClient, MemoryDatastore, Query};
    pub use crate::error::Error;
    pub use crate::records::{Record, RecordDraft, RecordManager, RecordPatch};
    pub use crate::PanRegistry;
}
