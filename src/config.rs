//! Connection settings for the hosted document store

use std::env;
use std::time::Duration;

use crate::error::Error;

/// Connection settings for the hosted document store.
///
/// Credentials are supplied externally at process start; there is no other
/// configuration surface.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store's REST API, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: String,

    /// Project identifier sent with every request
    pub project_id: String,

    /// API key sent with every request
    pub api_key: String,

    /// Database holding the record collection
    pub database_id: String,

    /// The one collection the whole system reads and writes
    pub collection_id: String,

    /// Per-request timeout for the HTTP client
    pub request_timeout: Option<Duration>,
}

impl StoreConfig {
    /// Create a new configuration with the default request timeout
    pub fn new(
        endpoint: &str,
        project_id: &str,
        api_key: &str,
        database_id: &str,
        collection_id: &str,
    ) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
            database_id: database_id.to_string(),
            collection_id: collection_id.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Load the configuration from `PANREG_*` environment variables
    ///
    /// Reads `PANREG_ENDPOINT`, `PANREG_PROJECT_ID`, `PANREG_API_KEY`,
    /// `PANREG_DATABASE_ID` and `PANREG_COLLECTION_ID`.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(
            &env_var("PANREG_ENDPOINT")?,
            &env_var("PANREG_PROJECT_ID")?,
            &env_var("PANREG_API_KEY")?,
            &env_var("PANREG_DATABASE_ID")?,
            &env_var("PANREG_COLLECTION_ID")?,
        ))
    }
}

fn env_var(name: &str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::config(format!("{} is not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_endpoint() {
        let config = StoreConfig::new("https://db.example.com/v1/", "p", "k", "main", "records");
        assert_eq!(config.endpoint, "https://db.example.com/v1");
    }

    #[test]
    fn timeout_can_be_disabled() {
        let config = StoreConfig::new("https://db.example.com/v1", "p", "k", "main", "records")
            .with_request_timeout(None);
        assert!(config.request_timeout.is_none());
    }
}
