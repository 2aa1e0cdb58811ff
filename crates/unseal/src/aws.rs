//! AWS client wiring
//!
//! Shared SDK config is loaded once per process; clients are built per
//! invocation so region and endpoint settings are picked up fresh.

use std::sync::Arc;

use aws_config::{BehaviorVersion, SdkConfig};
use unseal_core::Settings;
use unseal_pgp::SequoiaDecryptor;
use unseal_secrets::{AwsSecretStore, KeyResolver, SecretStore};
use unseal_storage::S3Backend;

use crate::pipeline::Pipeline;

/// Load region, credentials and retry settings from the environment
pub async fn load_sdk_config() -> SdkConfig {
    aws_config::load_defaults(BehaviorVersion::latest()).await
}

/// Build a production pipeline: S3 storage, Secrets Manager, Sequoia
pub fn build_pipeline(sdk_config: &SdkConfig, settings: Settings) -> Pipeline {
    let store = Arc::new(S3Backend::from_sdk_config(
        sdk_config,
        settings.s3_endpoint.as_deref(),
    ));

    // Only talk to Secrets Manager when a secret is configured
    let secrets: Option<Arc<dyn SecretStore>> = settings.key.secret_name.as_ref().map(|_| {
        Arc::new(AwsSecretStore::from_sdk_config(
            sdk_config,
            settings.key.secret_region.as_deref(),
        )) as Arc<dyn SecretStore>
    });

    let resolver = KeyResolver::new(&settings.key, secrets);

    Pipeline::new(settings, resolver, store, Arc::new(SequoiaDecryptor::new()))
}
