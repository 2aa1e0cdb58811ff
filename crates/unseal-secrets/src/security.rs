//! Key material hygiene
//!
//! [`SecureString`] wipes its buffer on drop and never prints its contents.
//! [`KeyAudit`] records where key material came from without touching it.

use chrono::{DateTime, Utc};
use std::fmt;
use zeroize::Zeroizing;

/// String whose buffer is wiped on drop and redacted when formatted
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(Zeroizing<String>);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    /// Borrow the plaintext value
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString([REDACTED {} bytes])", self.len())
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Outcome of one key resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    Resolved { passphrase_supplied: bool },
    Failed { reason: String },
}

/// Audit record for key resolution
///
/// Carries the source description and outcome only; key and passphrase
/// values never reach it.
#[derive(Debug, Clone)]
pub struct KeyAudit {
    pub source: String,
    pub outcome: AuditOutcome,
    pub at: DateTime<Utc>,
}

impl KeyAudit {
    pub fn resolved(source: impl Into<String>, passphrase_supplied: bool) -> Self {
        Self {
            source: source.into(),
            outcome: AuditOutcome::Resolved {
                passphrase_supplied,
            },
            at: Utc::now(),
        }
    }

    pub fn failed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outcome: AuditOutcome::Failed {
                reason: reason.into(),
            },
            at: Utc::now(),
        }
    }

    /// Emit the record through tracing
    pub fn emit(&self) {
        match &self.outcome {
            AuditOutcome::Resolved {
                passphrase_supplied,
            } => tracing::info!(
                source = %self.source,
                passphrase_supplied,
                at = %self.at.to_rfc3339(),
                "PGP private key resolved"
            ),
            AuditOutcome::Failed { reason } => tracing::warn!(
                source = %self.source,
                reason = %reason,
                at = %self.at.to_rfc3339(),
                "PGP private key resolution failed"
            ),
        }
    }
}
