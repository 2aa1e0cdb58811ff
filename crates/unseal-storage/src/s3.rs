//! S3 backend
//!
//! Supports AWS S3 and S3-compatible storage (MinIO, LocalStack).

use crate::{location, ObjectStore, PutOptions, PutOutcome};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::Object;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use unseal_core::{Error, ObjectDescriptor, Result};

/// S3 implementation of [`ObjectStore`]
pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from shared SDK config and an optional custom endpoint
    pub fn from_sdk_config(sdk_config: &SdkConfig, endpoint: Option<&str>) -> Self {
        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(sdk_config);

        // Configure custom endpoint for S3-compatible storage
        if let Some(endpoint_url) = endpoint {
            debug!("Using custom S3 endpoint: {}", endpoint_url);
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint_url)
                .force_path_style(true); // Required for MinIO and many S3-compatible services
        }

        Self::new(Client::from_conf(s3_config_builder.build()))
    }
}

impl std::fmt::Debug for S3Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Backend").finish_non_exhaustive()
    }
}

/// Convert a listed S3 object; objects without a key are dropped
fn to_descriptor(object: Object) -> Option<ObjectDescriptor> {
    let key = object.key?;
    let last_modified = object
        .last_modified
        .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()));

    Some(ObjectDescriptor {
        key,
        size: object.size.unwrap_or(0).max(0) as u64,
        last_modified,
    })
}

#[async_trait]
impl ObjectStore for S3Backend {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectDescriptor>> {
        debug!("Listing objects in s3://{}/{}", bucket, prefix);

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket).prefix(prefix);

            if let Some(token) = continuation_token {
                request = request.continuation_token(token);
            }

            let resp = request.send().await.map_err(|e| {
                Error::storage(format!(
                    "Failed to list s3://{}/{}: {}",
                    bucket,
                    prefix,
                    DisplayErrorContext(&e)
                ))
            })?;

            if let Some(contents) = resp.contents {
                objects.extend(contents.into_iter().filter_map(to_descriptor));
            }

            if resp.is_truncated == Some(true) {
                continuation_token = resp.next_continuation_token;
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!("Found {} objects", objects.len());
        Ok(objects)
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        debug!("Downloading s3://{}/{}", bucket, key);

        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    Error::storage(format!("Object not found: s3://{}/{}", bucket, key))
                } else {
                    Error::storage(format!(
                        "Failed to download s3://{}/{}: {}",
                        bucket,
                        key,
                        DisplayErrorContext(&service_error)
                    ))
                }
            })?;

        let body = resp.body.collect().await.map_err(|e| {
            Error::storage(format!(
                "Failed to read body of s3://{}/{}: {}",
                bucket, key, e
            ))
        })?;

        let data = body.into_bytes().to_vec();
        debug!("Downloaded {} bytes from s3://{}/{}", data.len(), bucket, key);

        Ok(data)
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        options: &PutOptions,
    ) -> Result<PutOutcome> {
        let size = body.len();
        debug!("Uploading ({} bytes): s3://{}/{}", size, bucket, key);

        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(&options.content_type);

        for (name, value) in &options.metadata {
            request = request.metadata(name, value);
        }

        let resp = request.send().await.map_err(|e| {
            Error::storage(format!(
                "Failed to upload s3://{}/{}: {}",
                bucket,
                key,
                DisplayErrorContext(&e)
            ))
        })?;

        info!(
            "Uploaded s3://{}/{} ({} bytes, version: {})",
            bucket,
            key,
            size,
            resp.version_id.as_deref().unwrap_or("none")
        );

        Ok(PutOutcome {
            key: key.to_string(),
            location: location(bucket, key),
        })
    }
}
