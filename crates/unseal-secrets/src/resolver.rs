//! Key resolution orchestration
//!
//! Tries an ordered list of key sources and returns the first hit:
//! 1. Environment override (`PGP_PRIVATE_KEY` / `PGP_PASSPHRASE`)
//! 2. Local key file (`PGP_PRIVATE_KEY_FILE`)
//! 3. Secrets Manager (`PGP_SECRET_NAME`)
//!
//! A passphrase override in the environment applies whichever source wins.

use crate::security::{KeyAudit, SecureString};
use crate::sources::env::read_var;
use crate::sources::{EnvSource, FileSource, KeySource, SecretStore, SecretsManagerSource};
use crate::types::{KeyMaterial, ResolvedKey};
use std::sync::Arc;
use tracing::debug;
use unseal_core::config::ENV_PASSPHRASE;
use unseal_core::{Error, KeySettings, Result};

/// Resolver that walks key sources in order
pub struct KeyResolver {
    sources: Vec<Box<dyn KeySource>>,
    passphrase_override: Option<SecureString>,
}

impl KeyResolver {
    /// Create the standard source chain from settings
    pub fn new(settings: &KeySettings, store: Option<Arc<dyn SecretStore>>) -> Self {
        let sources: Vec<Box<dyn KeySource>> = vec![
            Box::new(EnvSource::new()),
            Box::new(FileSource::new(settings.key_file.as_deref())),
            Box::new(SecretsManagerSource::new(
                store,
                settings.secret_name.clone(),
                settings.key_field.clone(),
            )),
        ];

        Self::with_sources(sources, read_var(ENV_PASSPHRASE))
    }

    /// Create with custom sources (for testing)
    pub fn with_sources(
        sources: Vec<Box<dyn KeySource>>,
        passphrase_override: Option<SecureString>,
    ) -> Self {
        Self {
            sources,
            passphrase_override,
        }
    }

    /// Resolve key material, failing with a configuration error if no
    /// source can supply it
    pub async fn resolve(&self) -> Result<KeyMaterial> {
        for source in &self.sources {
            match source.resolve().await {
                Ok(Some(ResolvedKey {
                    material,
                    resolved_from,
                })) => {
                    let material = self.apply_passphrase_override(material);
                    KeyAudit::resolved(resolved_from.to_string(), material.passphrase().is_some())
                        .emit();
                    return Ok(material);
                }
                Ok(None) => {
                    debug!("Key source '{}' not configured", source.name());
                }
                Err(e) => {
                    KeyAudit::failed(source.name(), e.message()).emit();
                    return Err(match e {
                        Error::Configuration { .. } => e,
                        other => Error::configuration(format!(
                            "Key source '{}' failed: {}",
                            source.name(),
                            other
                        )),
                    });
                }
            }
        }

        let tried: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        Err(Error::configuration(format!(
            "No PGP private key available (tried: {})",
            tried.join(", ")
        )))
    }

    fn apply_passphrase_override(&self, material: KeyMaterial) -> KeyMaterial {
        match &self.passphrase_override {
            Some(passphrase) => material.with_passphrase(Some(passphrase.clone())),
            None => material,
        }
    }
}
