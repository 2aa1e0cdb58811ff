//! AWS Secrets Manager key source
//!
//! The secret payload is a JSON object holding the armored key under a
//! configurable field (default `pgp-key`) and an optional `passphrase`.
//! A payload that is itself an armored key block is accepted as-is.

use crate::security::SecureString;
use crate::sources::KeySource;
use crate::types::{KeyMaterial, ResolvedFrom, ResolvedKey};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::primitives::Blob;
use aws_sdk_secretsmanager::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use unseal_core::config::SECRET_PASSPHRASE_FIELD;
use unseal_core::{Error, Result};

const ARMOR_HEADER: &str = "-----BEGIN PGP";

/// Read access to a named-secret store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the string value of a secret
    ///
    /// Returns Ok(None) if the secret does not exist.
    async fn get_secret_string(&self, name: &str) -> Result<Option<String>>;
}

/// Secrets Manager backed [`SecretStore`]
pub struct AwsSecretStore {
    client: Client,
}

impl AwsSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from shared SDK config, optionally pinned to a region
    pub fn from_sdk_config(sdk_config: &SdkConfig, region: Option<&str>) -> Self {
        let mut builder = aws_sdk_secretsmanager::config::Builder::from(sdk_config);
        if let Some(region) = region {
            debug!("Using secrets manager region: {}", region);
            builder = builder.region(Region::new(region.to_string()));
        }
        Self::new(Client::from_conf(builder.build()))
    }
}

impl std::fmt::Debug for AwsSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn get_secret_string(&self, name: &str) -> Result<Option<String>> {
        debug!("Fetching secret: {}", name);

        let output = match self.client.get_secret_value().secret_id(name).send().await {
            Ok(output) => output,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_resource_not_found_exception() {
                    debug!("Secret does not exist: {}", name);
                    return Ok(None);
                }
                return Err(Error::configuration(format!(
                    "Failed to fetch secret '{}': {}",
                    name,
                    DisplayErrorContext(&service_error)
                )));
            }
        };

        secret_text(name, output.secret_string(), output.secret_binary()).map(Some)
    }
}

/// Pick the text of a secret, preferring the string value over the binary one
fn secret_text(name: &str, string: Option<&str>, binary: Option<&Blob>) -> Result<String> {
    if let Some(value) = string {
        return Ok(value.to_string());
    }

    match binary {
        Some(blob) => String::from_utf8(blob.as_ref().to_vec()).map_err(|_| {
            Error::configuration(format!("Secret '{}' binary value is not UTF-8", name))
        }),
        None => Err(Error::configuration(format!(
            "Secret '{}' has no value",
            name
        ))),
    }
}

/// Resolves key material from a named secret
pub struct SecretsManagerSource {
    store: Option<Arc<dyn SecretStore>>,
    secret_name: Option<String>,
    key_field: String,
}

impl SecretsManagerSource {
    pub fn new(
        store: Option<Arc<dyn SecretStore>>,
        secret_name: Option<String>,
        key_field: impl Into<String>,
    ) -> Self {
        Self {
            store,
            secret_name,
            key_field: key_field.into(),
        }
    }

    /// Extract key material from a secret payload
    ///
    /// Error messages name fields, never values.
    fn parse_payload(&self, name: &str, payload: &str) -> Result<KeyMaterial> {
        if payload.trim_start().starts_with(ARMOR_HEADER) {
            debug!("Secret '{}' holds a bare armored key", name);
            return Ok(KeyMaterial::new(SecureString::from(payload), None));
        }

        let value: Value = serde_json::from_str(payload).map_err(|e| {
            Error::configuration(format!(
                "Secret '{}' is neither JSON nor an armored key (line {}, column {})",
                name,
                e.line(),
                e.column()
            ))
        })?;

        let Value::Object(fields) = value else {
            return Err(Error::configuration(format!(
                "Secret '{}' must be a JSON object",
                name
            )));
        };

        let key = fields
            .get(&self.key_field)
            .and_then(Value::as_str)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Field '{}' not found in secret '{}'",
                    self.key_field, name
                ))
            })?;

        let passphrase = fields
            .get(SECRET_PASSPHRASE_FIELD)
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(SecureString::from);

        Ok(KeyMaterial::new(SecureString::from(key), passphrase))
    }
}

#[async_trait]
impl KeySource for SecretsManagerSource {
    async fn resolve(&self) -> Result<Option<ResolvedKey>> {
        let (Some(store), Some(name)) = (&self.store, &self.secret_name) else {
            return Ok(None);
        };

        let payload = store
            .get_secret_string(name)
            .await?
            .ok_or_else(|| Error::configuration(format!("Secret '{}' not found", name)))?;

        let material = self.parse_payload(name, &payload)?;
        debug!("Resolved private key from secret: {}", name);

        Ok(Some(ResolvedKey {
            material,
            resolved_from: ResolvedFrom::SecretsManager { name: name.clone() },
        }))
    }

    fn name(&self) -> &'static str {
        "secrets-manager"
    }
}
