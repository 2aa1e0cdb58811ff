//! Per-object decrypt worker

use std::sync::Arc;

use tracing::{debug, info, warn};
use unseal_core::{
    DestinationNamer, Error, ObjectDescriptor, ProcessingResult, Result, Settings,
};
use unseal_pgp::PgpDecryptor;
use unseal_secrets::KeyMaterial;
use unseal_storage::{ObjectStore, PutOptions, PutOutcome};

/// User metadata naming the ciphertext an upload was decrypted from
pub const METADATA_DECRYPTED_FROM: &str = "decrypted-from";

/// Downloads, decrypts and re-uploads one object at a time
pub struct DecryptWorker {
    bucket: String,
    namer: DestinationNamer,
    store: Arc<dyn ObjectStore>,
    decryptor: Arc<dyn PgpDecryptor>,
}

impl DecryptWorker {
    pub fn new(
        settings: &Settings,
        store: Arc<dyn ObjectStore>,
        decryptor: Arc<dyn PgpDecryptor>,
    ) -> Self {
        Self {
            bucket: settings.bucket.clone(),
            namer: DestinationNamer::new(
                settings.dest_prefix.clone(),
                settings.encrypted_suffix.clone(),
                settings.decrypted_suffix.clone(),
            ),
            store,
            decryptor,
        }
    }

    /// Process one listed object
    ///
    /// Returns None for directory placeholders. Any download, decryption or
    /// upload error is captured in a failure result.
    pub async fn process(
        &self,
        descriptor: &ObjectDescriptor,
        key: &KeyMaterial,
    ) -> Option<ProcessingResult> {
        if descriptor.is_directory_marker() {
            debug!(key = %descriptor.key, "Skipping directory placeholder");
            return None;
        }

        let result = match self.decrypt_object(descriptor, key).await {
            Ok(outcome) => {
                info!(
                    source = %descriptor.key,
                    destination = %outcome.key,
                    location = %outcome.location,
                    size = descriptor.size,
                    "Decrypted object"
                );
                ProcessingResult::success(descriptor, outcome.key)
            }
            Err(e) => {
                warn!(
                    source = %descriptor.key,
                    kind = %e.kind(),
                    "Failed to decrypt object: {}",
                    e
                );
                ProcessingResult::failure(descriptor, &e)
            }
        };

        Some(result)
    }

    async fn decrypt_object(
        &self,
        descriptor: &ObjectDescriptor,
        key: &KeyMaterial,
    ) -> Result<PutOutcome> {
        let ciphertext = self.store.get(&self.bucket, &descriptor.key).await?;
        let plaintext = self.decrypt_blocking(key, ciphertext).await?;

        let destination = self.namer.destination_key(&descriptor.key);
        let options =
            PutOptions::octet_stream().with_metadata(METADATA_DECRYPTED_FROM, &descriptor.key);

        self.store
            .put(&self.bucket, &destination, plaintext, &options)
            .await
    }

    /// Decrypt on the blocking pool
    async fn decrypt_blocking(&self, key: &KeyMaterial, ciphertext: Vec<u8>) -> Result<Vec<u8>> {
        let decryptor = Arc::clone(&self.decryptor);
        let key = key.clone();

        tokio::task::spawn_blocking(move || {
            decryptor.decrypt(key.private_key(), key.passphrase(), &ciphertext)
        })
        .await
        .map_err(|e| Error::unexpected(format!("Decryption task failed: {}", e)))?
    }
}
