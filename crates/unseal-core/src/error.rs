//! Error types for unseal-core

use serde::Serialize;
use thiserror::Error;

/// Result type alias using unseal-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised anywhere in the decrypt pipeline
///
/// `Configuration` aborts an invocation before any object is touched.
/// `Storage` and `Decryption` are isolated to the object that raised them,
/// except when listing fails, which aborts the invocation.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid setup (settings, key material, secret payload)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Listing, download or upload failure
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Bad key, bad passphrase or malformed ciphertext
    #[error("Decryption error: {message}")]
    Decryption { message: String },

    /// Anything else, such as a crashed decryption task
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

/// Coarse classification of an [`Error`], reported with failed results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Configuration,
    Storage,
    Decryption,
    Unexpected,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Storage => write!(f, "storage"),
            ErrorKind::Decryption => write!(f, "decryption"),
            ErrorKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a decryption error
    pub fn decryption(message: impl Into<String>) -> Self {
        Self::Decryption {
            message: message.into(),
        }
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Storage { .. } => ErrorKind::Storage,
            Error::Decryption { .. } => ErrorKind::Decryption,
            Error::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// The underlying message, without the category prefix used by `Display`
    pub fn message(&self) -> String {
        match self {
            Error::Configuration { message }
            | Error::Storage { message }
            | Error::Decryption { message }
            | Error::Unexpected { message } => message.clone(),
        }
    }
}
