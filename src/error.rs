//! Error handling for the record registry

use std::fmt;
use thiserror::Error;

/// Unified error type for the registry client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The store accepted the connection but rejected the request
    #[error("store error: {message} (status {status})")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// A document the store returned could not be mapped into a record
    #[error("malformed document: {0}")]
    Decode(String),

    /// Mobile number is not exactly 10 decimal digits
    #[error("Please enter a valid 10-digit mobile number")]
    InvalidMobile,

    /// Aadhaar number is not exactly 12 decimal digits
    #[error("Please enter a valid 12-digit Aadhaar number")]
    InvalidAadhaar,

    /// Date of birth could not be parsed from the given input
    #[error("Please enter a valid date of birth (DD/MM/YYYY)")]
    InvalidDob,

    /// Another record already holds this Aadhaar number
    #[error("A record with this Aadhaar number already exists")]
    DuplicateAadhaar,

    /// Edit or delete target does not exist
    #[error("record not found: {0}")]
    NotFound(String),

    /// Missing or unusable connection settings
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new decode error
    pub fn decode<T: fmt::Display>(msg: T) -> Self {
        Error::Decode(msg.to_string())
    }

    /// Create a new not-found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Error::NotFound(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// True for rejections detected locally, before any remote call.
    ///
    /// These are always recoverable: the operation was blocked and neither
    /// the local mirror nor the store changed.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidMobile
                | Error::InvalidAadhaar
                | Error::InvalidDob
                | Error::DuplicateAadhaar
        )
    }
}
