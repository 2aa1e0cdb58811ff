//! Key material types

use crate::security::SecureString;
use std::path::PathBuf;

/// Armored private key plus optional passphrase
///
/// Sourced once per invocation and never persisted. Both values are zeroed
/// on drop and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    private_key: SecureString,
    passphrase: Option<SecureString>,
}

impl KeyMaterial {
    pub fn new(private_key: impl Into<SecureString>, passphrase: Option<SecureString>) -> Self {
        Self {
            private_key: private_key.into(),
            passphrase,
        }
    }

    /// The armored private key
    pub fn private_key(&self) -> &str {
        self.private_key.as_str()
    }

    /// The passphrase, if one was supplied
    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_ref().map(SecureString::as_str)
    }

    /// Replace the passphrase
    pub fn with_passphrase(mut self, passphrase: Option<SecureString>) -> Self {
        self.passphrase = passphrase;
        self
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("private_key", &self.private_key)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Where key material was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedFrom {
    Env,
    File(PathBuf),
    SecretsManager { name: String },
}

impl std::fmt::Display for ResolvedFrom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedFrom::Env => write!(f, "environment"),
            ResolvedFrom::File(path) => write!(f, "file: {}", path.display()),
            ResolvedFrom::SecretsManager { name } => write!(f, "secrets manager: {}", name),
        }
    }
}

/// Key material together with its origin
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    pub material: KeyMaterial,
    pub resolved_from: ResolvedFrom,
}
