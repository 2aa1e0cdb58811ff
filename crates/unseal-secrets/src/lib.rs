//! PGP key material resolution for unseal
//!
//! This crate provides:
//! - **Ordered resolution**: environment override, local file, AWS Secrets Manager
//! - **Security**: memory zeroing with zeroize, redacted `Debug`, audit logging

pub mod resolver;
pub mod security;
pub mod sources;
pub mod types;

pub use resolver::KeyResolver;
pub use security::{AuditOutcome, KeyAudit, SecureString};
pub use sources::{
    AwsSecretStore, EnvSource, FileSource, KeySource, SecretStore, SecretsManagerSource,
};
pub use types::{KeyMaterial, ResolvedFrom, ResolvedKey};
