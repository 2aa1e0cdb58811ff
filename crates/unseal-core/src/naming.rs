//! Destination key naming

/// Naming rule for decrypted objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationNamer {
    dest_prefix: String,
    encrypted_suffix: String,
    decrypted_suffix: String,
}

impl DestinationNamer {
    pub fn new(
        dest_prefix: impl Into<String>,
        encrypted_suffix: impl Into<String>,
        decrypted_suffix: impl Into<String>,
    ) -> Self {
        Self {
            dest_prefix: dest_prefix.into(),
            encrypted_suffix: encrypted_suffix.into(),
            decrypted_suffix: decrypted_suffix.into(),
        }
    }

    /// Build the destination key for a source key
    ///
    /// Only the final path segment of the source survives. The ciphertext
    /// suffix is stripped when present, otherwise the decrypted marker is
    /// appended. The prefix is prepended verbatim.
    pub fn destination_key(&self, source_key: &str) -> String {
        let name = basename(source_key);
        let stem = if self.encrypted_suffix.is_empty() {
            None
        } else {
            name.strip_suffix(self.encrypted_suffix.as_str())
                .filter(|stem| !stem.is_empty())
        };

        match stem {
            Some(stem) => format!("{}{}", self.dest_prefix, stem),
            None => format!("{}{}{}", self.dest_prefix, name, self.decrypted_suffix),
        }
    }
}

/// Final `/`-separated segment of a key
pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
