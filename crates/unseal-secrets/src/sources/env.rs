//! Environment variable key source
//!
//! Reads the armored key and passphrase straight from the process
//! environment. Takes precedence over every other source.

use crate::security::SecureString;
use crate::sources::KeySource;
use crate::types::{KeyMaterial, ResolvedFrom, ResolvedKey};
use async_trait::async_trait;
use tracing::debug;
use unseal_core::config::{ENV_PASSPHRASE, ENV_PRIVATE_KEY};
use unseal_core::Result;

pub struct EnvSource {
    key_var: String,
    passphrase_var: String,
}

impl EnvSource {
    pub fn new() -> Self {
        Self::with_vars(ENV_PRIVATE_KEY, ENV_PASSPHRASE)
    }

    /// Read from custom variable names
    pub fn with_vars(key_var: impl Into<String>, passphrase_var: impl Into<String>) -> Self {
        Self {
            key_var: key_var.into(),
            passphrase_var: passphrase_var.into(),
        }
    }
}

/// Read a variable, treating blank values as unset
pub(crate) fn read_var(name: &str) -> Option<SecureString> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecureString::from)
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeySource for EnvSource {
    async fn resolve(&self) -> Result<Option<ResolvedKey>> {
        let Some(key) = read_var(&self.key_var) else {
            debug!("{} not set, skipping environment key source", self.key_var);
            return Ok(None);
        };

        debug!("Resolved private key from {}", self.key_var);
        Ok(Some(ResolvedKey {
            material: KeyMaterial::new(key, read_var(&self.passphrase_var)),
            resolved_from: ResolvedFrom::Env,
        }))
    }

    fn name(&self) -> &'static str {
        "env"
    }
}
