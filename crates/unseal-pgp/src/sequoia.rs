//! Sequoia-backed decryption

use crate::PgpDecryptor;
use openpgp::cert::Cert;
use openpgp::crypto::{KeyPair, Password, SessionKey};
use openpgp::packet::{PKESK, SKESK};
use openpgp::parse::stream::{
    DecryptionHelper, DecryptorBuilder, MessageStructure, VerificationHelper,
};
use openpgp::parse::Parse;
use openpgp::policy::StandardPolicy;
use openpgp::types::SymmetricAlgorithm;
use openpgp::{Fingerprint, KeyHandle};
use sequoia_openpgp as openpgp;
use std::io::Read;
use tracing::debug;
use unseal_core::{Error, Result};

/// [`PgpDecryptor`] using the Sequoia OpenPGP implementation
pub struct SequoiaDecryptor {
    policy: StandardPolicy<'static>,
}

impl SequoiaDecryptor {
    pub fn new() -> Self {
        Self {
            policy: StandardPolicy::new(),
        }
    }

    /// Parse the key and unlock every secret encryption subkey
    fn unlock_keys(&self, armored_key: &str, passphrase: Option<&str>) -> Result<Vec<KeyPair>> {
        let cert = Cert::from_bytes(armored_key.as_bytes())
            .map_err(|e| Error::decryption(format!("Failed to read private key: {:#}", e)))?;

        let password = passphrase.map(Password::from);
        let mut pairs = Vec::new();
        let mut locked = 0usize;

        for ka in cert
            .keys()
            .with_policy(&self.policy, None)
            .secret()
            .for_transport_encryption()
            .for_storage_encryption()
        {
            let mut key = ka.key().clone();

            if key.secret().is_encrypted() {
                match &password {
                    Some(password) => {
                        key = key.decrypt_secret(password).map_err(|e| {
                            Error::decryption(format!(
                                "Failed to unlock private key (wrong passphrase?): {:#}",
                                e
                            ))
                        })?;
                    }
                    None => {
                        locked += 1;
                        continue;
                    }
                }
            }

            let pair = key
                .into_keypair()
                .map_err(|e| Error::decryption(format!("Unusable private key: {:#}", e)))?;
            pairs.push(pair);
        }

        if pairs.is_empty() {
            return Err(if locked > 0 {
                Error::decryption(
                    "Private key is passphrase-protected but no passphrase was supplied",
                )
            } else {
                Error::decryption("Private key has no usable secret encryption subkey")
            });
        }

        debug!("Unlocked {} decryption subkey(s)", pairs.len());
        Ok(pairs)
    }
}

impl Default for SequoiaDecryptor {
    fn default() -> Self {
        Self::new()
    }
}

impl PgpDecryptor for SequoiaDecryptor {
    fn decrypt(
        &self,
        armored_key: &str,
        passphrase: Option<&str>,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        if ciphertext.is_empty() {
            return Err(Error::decryption("Encrypted message is empty"));
        }

        let helper = Helper {
            pairs: self.unlock_keys(armored_key, passphrase)?,
        };

        let mut decryptor = DecryptorBuilder::from_bytes(ciphertext)
            .map_err(|e| Error::decryption(format!("Failed to parse encrypted message: {:#}", e)))?
            .with_policy(&self.policy, None, helper)
            .map_err(|e| Error::decryption(format!("Failed to decrypt message: {:#}", e)))?;

        let mut plaintext = Vec::new();
        decryptor
            .read_to_end(&mut plaintext)
            .map_err(|e| Error::decryption(format!("Failed to read decrypted message: {}", e)))?;

        Ok(plaintext)
    }
}

/// Supplies unlocked key pairs to Sequoia's streaming decryptor
///
/// Signatures are not checked; messages are only decrypted.
struct Helper {
    pairs: Vec<KeyPair>,
}

impl VerificationHelper for Helper {
    fn get_certs(&mut self, _ids: &[KeyHandle]) -> openpgp::Result<Vec<Cert>> {
        Ok(Vec::new())
    }

    fn check(&mut self, _structure: MessageStructure) -> openpgp::Result<()> {
        Ok(())
    }
}

impl DecryptionHelper for Helper {
    fn decrypt<D>(
        &mut self,
        pkesks: &[PKESK],
        _skesks: &[SKESK],
        sym_algo: Option<SymmetricAlgorithm>,
        mut decrypt: D,
    ) -> openpgp::Result<Option<Fingerprint>>
    where
        D: FnMut(SymmetricAlgorithm, &SessionKey) -> bool,
    {
        for pkesk in pkesks {
            for pair in self.pairs.iter_mut() {
                if let Some((algo, session_key)) = pkesk.decrypt(&mut *pair, sym_algo) {
                    if decrypt(algo, &session_key) {
                        return Ok(None);
                    }
                }
            }
        }

        Err(openpgp::Error::MissingSessionKey(
            "No private key matches any recipient of the message".into(),
        )
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpgp::armor;
    use openpgp::cert::CertBuilder;
    use openpgp::serialize::stream::{Encryptor, LiteralWriter, Message};
    use openpgp::serialize::SerializeInto;
    use std::io::Write;

    fn generate(password: Option<&str>) -> (Cert, String) {
        let (cert, _revocation) = CertBuilder::general_purpose(None, Some("alice@example.org"))
            .set_password(password.map(Password::from))
            .generate()
            .unwrap();
        let armored = String::from_utf8(cert.as_tsk().armored().to_vec().unwrap()).unwrap();
        (cert, armored)
    }

    #[allow(deprecated)]
    fn encrypt_into<W: Write + Send + Sync>(cert: &Cert, sink: W, plaintext: &[u8]) {
        let policy = StandardPolicy::new();
        let recipients = cert
            .keys()
            .with_policy(&policy, None)
            .alive()
            .revoked(false)
            .for_transport_encryption();

        let message = Message::new(sink);
        let message = Encryptor::for_recipients(message, recipients).build().unwrap();
        let mut writer = LiteralWriter::new(message).build().unwrap();
        writer.write_all(plaintext).unwrap();
        writer.finalize().unwrap();
    }

    fn encrypt(cert: &Cert, plaintext: &[u8]) -> Vec<u8> {
        let mut sink = Vec::new();
        encrypt_into(cert, &mut sink, plaintext);
        sink
    }

    #[test]
    fn test_round_trip_with_passphrase() {
        let (cert, key) = generate(Some("correct horse"));
        let ciphertext = encrypt(&cert, b"quarterly numbers");

        let plaintext = SequoiaDecryptor::new()
            .decrypt(&key, Some("correct horse"), &ciphertext)
            .unwrap();
        assert_eq!(plaintext, b"quarterly numbers");
    }

    #[test]
    fn test_round_trip_unprotected_key() {
        let (cert, key) = generate(None);
        let ciphertext = encrypt(&cert, b"hello");

        let plaintext = SequoiaDecryptor::new().decrypt(&key, None, &ciphertext).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn test_armored_ciphertext() {
        let (cert, key) = generate(None);

        let mut sink = Vec::new();
        let mut armorer = armor::Writer::new(&mut sink, armor::Kind::Message).unwrap();
        encrypt_into(&cert, &mut armorer, b"armored body");
        armorer.finalize().unwrap();

        assert!(sink.starts_with(b"-----BEGIN PGP MESSAGE-----"));
        let plaintext = SequoiaDecryptor::new().decrypt(&key, None, &sink).unwrap();
        assert_eq!(plaintext, b"armored body");
    }

    #[test]
    fn test_wrong_passphrase() {
        let (cert, key) = generate(Some("right"));
        let ciphertext = encrypt(&cert, b"secret");

        let err = SequoiaDecryptor::new()
            .decrypt(&key, Some("wrong"), &ciphertext)
            .unwrap_err();
        assert!(matches!(err, Error::Decryption { .. }));
        assert!(err.to_string().contains("Failed to unlock private key"));
    }

    #[test]
    fn test_missing_passphrase_for_protected_key() {
        let (cert, key) = generate(Some("right"));
        let ciphertext = encrypt(&cert, b"secret");

        let err = SequoiaDecryptor::new()
            .decrypt(&key, None, &ciphertext)
            .unwrap_err();
        assert!(err.to_string().contains("no passphrase was supplied"));
    }

    #[test]
    fn test_message_for_another_recipient() {
        let (other, _) = generate(None);
        let (_, key) = generate(None);
        let ciphertext = encrypt(&other, b"not for us");

        let err = SequoiaDecryptor::new()
            .decrypt(&key, None, &ciphertext)
            .unwrap_err();
        assert!(matches!(err, Error::Decryption { .. }));
    }

    #[test]
    fn test_corrupted_ciphertext() {
        let (cert, key) = generate(None);
        let mut ciphertext = encrypt(&cert, b"some longer plaintext that spans a few bytes");
        let middle = ciphertext.len() / 2;
        ciphertext[middle] ^= 0xff;

        let err = SequoiaDecryptor::new()
            .decrypt(&key, None, &ciphertext)
            .unwrap_err();
        assert!(matches!(err, Error::Decryption { .. }));
    }

    #[test]
    fn test_not_a_pgp_message() {
        let (_, key) = generate(None);

        let err = SequoiaDecryptor::new()
            .decrypt(&key, None, b"plain text, not encrypted")
            .unwrap_err();
        assert!(matches!(err, Error::Decryption { .. }));
    }

    #[test]
    fn test_empty_ciphertext() {
        let (_, key) = generate(None);

        let err = SequoiaDecryptor::new().decrypt(&key, None, b"").unwrap_err();
        assert_eq!(err.message(), "Encrypted message is empty");
    }

    #[test]
    fn test_invalid_private_key() {
        let err = SequoiaDecryptor::new()
            .decrypt("not a key", None, b"\x85\x01")
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read private key"));
    }

    #[test]
    fn test_public_key_only() {
        let (cert, _) = generate(None);
        let public = String::from_utf8(cert.armored().to_vec().unwrap()).unwrap();
        let ciphertext = encrypt(&cert, b"x");

        let err = SequoiaDecryptor::new()
            .decrypt(&public, None, &ciphertext)
            .unwrap_err();
        assert!(err.to_string().contains("no usable secret encryption subkey"));
    }
}
