//! Key source trait and implementations

pub mod env;
pub mod file;
pub mod secrets_manager;

use crate::types::ResolvedKey;
use async_trait::async_trait;
use unseal_core::Result;

/// One strategy for obtaining key material
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Resolve key material from this source
    ///
    /// Returns Ok(Some(key)) if resolved successfully
    /// Returns Ok(None) if this source is not configured
    /// Returns Err if the source is configured but unusable
    async fn resolve(&self) -> Result<Option<ResolvedKey>>;

    /// Source name for logs and error messages
    fn name(&self) -> &'static str;
}

pub use env::EnvSource;
pub use file::FileSource;
pub use secrets_manager::{AwsSecretStore, SecretStore, SecretsManagerSource};
