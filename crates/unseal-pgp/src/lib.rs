//! OpenPGP message decryption for unseal
//!
//! The pipeline decrypts through [`PgpDecryptor`]; [`SequoiaDecryptor`] is the
//! production implementation.

pub mod sequoia;

pub use sequoia::SequoiaDecryptor;

use unseal_core::Result;

/// Decrypts OpenPGP messages with an armored private key
pub trait PgpDecryptor: Send + Sync {
    /// Decrypt `ciphertext` (binary or armored)
    ///
    /// The key is unlocked with `passphrase` when one is given. Every failure
    /// (unreadable key, bad passphrase, wrong recipient, malformed or
    /// tampered message) is reported as a decryption error.
    fn decrypt(
        &self,
        armored_key: &str,
        passphrase: Option<&str>,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>>;
}
