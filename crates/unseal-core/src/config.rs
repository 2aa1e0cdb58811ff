//! Invocation settings
//!
//! Settings are read from the environment at the start of every invocation.
//! Every optional value has an explicit default below; a missing bucket is a
//! configuration error.

use crate::error::{Error, Result};

/// Environment variable naming the bucket
pub const ENV_BUCKET_NAME: &str = "BUCKET_NAME";
/// Environment variable naming the source prefix
pub const ENV_SOURCE_PREFIX: &str = "SOURCE_PREFIX";
/// Environment variable naming the destination prefix
pub const ENV_DEST_PREFIX: &str = "DEST_PREFIX";
/// Environment variable naming the Secrets Manager secret
pub const ENV_SECRET_NAME: &str = "PGP_SECRET_NAME";
/// Environment variable naming the Secrets Manager region
pub const ENV_SECRET_REGION: &str = "PGP_SECRET_REGION";
/// Environment variable naming the JSON field that holds the armored key
pub const ENV_SECRET_KEY_FIELD: &str = "PGP_SECRET_KEY_FIELD";
/// Direct armored key override
pub const ENV_PRIVATE_KEY: &str = "PGP_PRIVATE_KEY";
/// Direct passphrase override
pub const ENV_PASSPHRASE: &str = "PGP_PASSPHRASE";
/// Path of a file holding the armored key
pub const ENV_PRIVATE_KEY_FILE: &str = "PGP_PRIVATE_KEY_FILE";
/// Ciphertext suffix stripped from destination names
pub const ENV_ENCRYPTED_SUFFIX: &str = "ENCRYPTED_SUFFIX";
/// Marker appended when the ciphertext suffix is absent
pub const ENV_DECRYPTED_SUFFIX: &str = "DECRYPTED_SUFFIX";
/// Custom S3-compatible endpoint
pub const ENV_S3_ENDPOINT_URL: &str = "S3_ENDPOINT_URL";

/// Default source prefix
pub const DEFAULT_SOURCE_PREFIX: &str = "encrypted/";
/// Default destination prefix
pub const DEFAULT_DEST_PREFIX: &str = "decrypted/";
/// Default JSON field holding the armored key inside the secret payload
pub const DEFAULT_SECRET_KEY_FIELD: &str = "pgp-key";
/// JSON field holding the optional passphrase inside the secret payload
pub const SECRET_PASSPHRASE_FIELD: &str = "passphrase";
/// Default ciphertext suffix
pub const DEFAULT_ENCRYPTED_SUFFIX: &str = ".gpg";
/// Default decrypted marker suffix
pub const DEFAULT_DECRYPTED_SUFFIX: &str = ".decrypted";

/// Where the private key comes from and how to find it
///
/// Key and passphrase overrides are deliberately not stored here; they are
/// read by the key sources so the values never sit in a long-lived struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySettings {
    /// Secrets Manager secret id, if the store should be consulted
    pub secret_name: Option<String>,
    /// Region override for the secrets store
    pub secret_region: Option<String>,
    /// JSON field holding the armored key
    pub key_field: String,
    /// Local file holding the armored key
    pub key_file: Option<String>,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            secret_name: None,
            secret_region: None,
            key_field: DEFAULT_SECRET_KEY_FIELD.to_string(),
            key_file: None,
        }
    }
}

/// Settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Bucket holding both the ciphertext and the decrypted output
    pub bucket: String,
    /// Prefix listed for ciphertext
    pub source_prefix: String,
    /// Prefix receiving plaintext
    pub dest_prefix: String,
    /// Suffix stripped from decrypted file names
    pub encrypted_suffix: String,
    /// Suffix appended when `encrypted_suffix` is absent
    pub decrypted_suffix: String,
    /// Custom S3 endpoint (MinIO, LocalStack)
    pub s3_endpoint: Option<String>,
    /// Key resolution settings
    pub key: KeySettings,
}

impl Settings {
    /// Create settings for a bucket with every other value at its default
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            dest_prefix: DEFAULT_DEST_PREFIX.to_string(),
            encrypted_suffix: DEFAULT_ENCRYPTED_SUFFIX.to_string(),
            decrypted_suffix: DEFAULT_DECRYPTED_SUFFIX.to_string(),
            s3_endpoint: None,
            key: KeySettings::default(),
        }
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bucket = get(ENV_BUCKET_NAME).ok_or_else(|| {
            Error::configuration(format!("{} environment variable is required", ENV_BUCKET_NAME))
        })?;

        let mut settings = Self::new(bucket);
        if let Some(prefix) = get(ENV_SOURCE_PREFIX) {
            settings.source_prefix = prefix;
        }
        if let Some(prefix) = get(ENV_DEST_PREFIX) {
            settings.dest_prefix = prefix;
        }
        if let Some(suffix) = get(ENV_ENCRYPTED_SUFFIX) {
            settings.encrypted_suffix = suffix;
        }
        if let Some(suffix) = get(ENV_DECRYPTED_SUFFIX) {
            settings.decrypted_suffix = suffix;
        }
        settings.s3_endpoint = get(ENV_S3_ENDPOINT_URL);
        settings.key = KeySettings {
            secret_name: get(ENV_SECRET_NAME),
            secret_region: get(ENV_SECRET_REGION),
            key_field: get(ENV_SECRET_KEY_FIELD)
                .unwrap_or_else(|| DEFAULT_SECRET_KEY_FIELD.to_string()),
            key_file: get(ENV_PRIVATE_KEY_FILE),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would make the pipeline misbehave
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(Error::configuration("bucket name must not be empty"));
        }
        if !self.dest_prefix.is_empty() && self.dest_prefix == self.source_prefix {
            return Err(Error::configuration(format!(
                "destination prefix '{}' must differ from the source prefix",
                self.dest_prefix
            )));
        }
        if self.encrypted_suffix.is_empty() && self.decrypted_suffix.is_empty() {
            return Err(Error::configuration(
                "encrypted and decrypted suffixes cannot both be empty",
            ));
        }
        Ok(())
    }
}
