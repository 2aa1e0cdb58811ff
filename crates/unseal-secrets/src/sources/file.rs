//! File-based key source
//!
//! Reads an armored key from a local file, e.g. a mounted secret volume.

use crate::security::SecureString;
use crate::sources::KeySource;
use crate::types::{KeyMaterial, ResolvedFrom, ResolvedKey};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;
use unseal_core::{Error, Result};

pub struct FileSource {
    path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(path: Option<impl Into<PathBuf>>) -> Self {
        Self {
            path: path.map(Into::into),
        }
    }
}

#[async_trait]
impl KeySource for FileSource {
    async fn resolve(&self) -> Result<Option<ResolvedKey>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        // A configured file that cannot be read is a setup mistake, not a miss
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::configuration(format!(
                "Failed to read key file {}: {}",
                path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Err(Error::configuration(format!(
                "Key file {} is empty",
                path.display()
            )));
        }

        debug!("Resolved private key from file: {}", path.display());
        Ok(Some(ResolvedKey {
            material: KeyMaterial::new(SecureString::from(content), None),
            resolved_from: ResolvedFrom::File(path.clone()),
        }))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
