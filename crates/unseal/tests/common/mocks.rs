//! In-memory fakes for the storage, decryption and key seams

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use unseal_core::{Error, ObjectDescriptor, Result};
use unseal_pgp::PgpDecryptor;
use unseal_secrets::{
    KeyMaterial, KeySource, ResolvedFrom, ResolvedKey, SecretStore, SecureString,
};
use unseal_storage::{location, ObjectStore, PutOptions, PutOutcome};

/// Object written through [`MemoryStore::put`]
#[derive(Clone, Debug)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub options: Option<PutOptions>,
}

/// In-memory bucket recording every call made against it
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    sizes: Mutex<BTreeMap<String, u64>>,
    calls: Mutex<Vec<String>>,
    fail_list: Mutex<Option<String>>,
    fail_get: Mutex<HashSet<String>>,
    fail_put: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed an object; its listed size is the body length
    pub fn insert(&self, key: &str, body: &[u8]) {
        self.insert_with_size(key, body, body.len() as u64);
    }

    /// Seed an object with an explicit listed size
    pub fn insert_with_size(&self, key: &str, body: &[u8], size: u64) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                options: None,
            },
        );
        self.sizes.lock().unwrap().insert(key.to_string(), size);
    }

    pub fn fail_list_with(&self, message: &str) {
        *self.fail_list.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_get_for(&self, key: &str) {
        self.fail_get.lock().unwrap().insert(key.to_string());
    }

    pub fn fail_put_for(&self, key: &str) {
        self.fail_put.lock().unwrap().insert(key.to_string());
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Calls in order, formatted as `op:key`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, op: &str) -> usize {
        let prefix = format!("{}:", op);
        self.calls()
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .count()
    }

    fn record(&self, op: &str, key: &str) {
        self.calls.lock().unwrap().push(format!("{}:{}", op, key));
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, _bucket: &str, prefix: &str) -> Result<Vec<ObjectDescriptor>> {
        self.record("list", prefix);
        if let Some(message) = self.fail_list.lock().unwrap().clone() {
            return Err(Error::storage(message));
        }

        let sizes = self.sizes.lock().unwrap();
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .map(|key| ObjectDescriptor::new(key.clone(), sizes.get(key).copied().unwrap_or(0)))
            .collect())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.record("get", key);
        if self.fail_get.lock().unwrap().contains(key) {
            return Err(Error::storage(format!("Failed to download {}", location(bucket, key))));
        }

        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| Error::storage(format!("Object not found: {}", location(bucket, key))))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        options: &PutOptions,
    ) -> Result<PutOutcome> {
        self.record("put", key);
        if self.fail_put.lock().unwrap().contains(key) {
            return Err(Error::storage(format!("Failed to upload {}", location(bucket, key))));
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                options: Some(options.clone()),
            },
        );

        Ok(PutOutcome {
            key: key.to_string(),
            location: location(bucket, key),
        })
    }
}

/// Ciphertext prefix the scripted decryptor strips
pub const SCRIPTED_PREFIX: &[u8] = b"ENC:";

/// Ciphertext that makes the scripted decryptor panic
pub const SCRIPTED_PANIC: &[u8] = b"PANIC";

/// Decryptor that "decrypts" by stripping [`SCRIPTED_PREFIX`]
///
/// Ciphertext without the prefix fails with its own text as the message,
/// so `b"bad passphrase"` fails with "bad passphrase". [`SCRIPTED_PANIC`]
/// panics instead.
#[derive(Default)]
pub struct ScriptedDecryptor {
    seen: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedDecryptor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Key and passphrase passed to each call
    pub fn seen(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

impl PgpDecryptor for ScriptedDecryptor {
    fn decrypt(
        &self,
        armored_key: &str,
        passphrase: Option<&str>,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        self.seen
            .lock()
            .unwrap()
            .push((armored_key.to_string(), passphrase.map(str::to_string)));

        if ciphertext == SCRIPTED_PANIC {
            panic!("scripted decryptor panic");
        }

        match ciphertext.strip_prefix(SCRIPTED_PREFIX) {
            Some(plaintext) => Ok(plaintext.to_vec()),
            None => Err(Error::decryption(String::from_utf8_lossy(ciphertext))),
        }
    }
}

/// Key source returning fixed material
pub struct StaticKeySource {
    material: Option<KeyMaterial>,
}

impl StaticKeySource {
    pub fn new(key: &str, passphrase: Option<&str>) -> Self {
        Self {
            material: Some(KeyMaterial::new(key, passphrase.map(SecureString::from))),
        }
    }

    pub fn empty() -> Self {
        Self { material: None }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn resolve(&self) -> Result<Option<ResolvedKey>> {
        Ok(self.material.clone().map(|material| ResolvedKey {
            material,
            resolved_from: ResolvedFrom::Env,
        }))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Secret store backed by a map of name to payload
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: Mutex<BTreeMap<String, String>>,
    fetches: Mutex<usize>,
}

impl MemorySecretStore {
    pub fn with_secret(name: &str, payload: &str) -> Arc<Self> {
        let store = Self::default();
        store
            .secrets
            .lock()
            .unwrap()
            .insert(name.to_string(), payload.to_string());
        Arc::new(store)
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret_string(&self, name: &str) -> Result<Option<String>> {
        *self.fetches.lock().unwrap() += 1;
        Ok(self.secrets.lock().unwrap().get(name).cloned())
    }
}
