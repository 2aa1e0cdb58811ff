//! Object storage access for unseal
//!
//! The pipeline talks to storage only through [`ObjectStore`], so tests can
//! swap the S3 backend for an in-memory fake.

pub mod s3;

pub use s3::S3Backend;

use async_trait::async_trait;
use std::collections::BTreeMap;
use unseal_core::{ObjectDescriptor, Result};

/// Content type used for decrypted uploads
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Options for a single upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOptions {
    pub content_type: String,
    /// User metadata stored alongside the object
    pub metadata: BTreeMap<String, String>,
}

impl PutOptions {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn octet_stream() -> Self {
        Self::new(OCTET_STREAM)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Where an upload landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    pub key: String,
    pub location: String,
}

/// Bucket-level object operations
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object under `prefix`, following continuation tokens
    ///
    /// An empty listing is not an error.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectDescriptor>>;

    /// Download an object's bytes
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Upload bytes, overwriting any existing object at `key`
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        options: &PutOptions,
    ) -> Result<PutOutcome>;
}

/// `s3://bucket/key` location string
pub fn location(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}
