//! Pipeline data model

use crate::error::{Error, ErrorKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One storage object as returned by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectDescriptor {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
        }
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Whether the key is a "folder" placeholder rather than a file
    pub fn is_directory_marker(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// Outcome of processing one object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProcessingResult {
    Success {
        #[serde(rename = "originalFile")]
        original_key: String,
        #[serde(rename = "decryptedFile")]
        decrypted_key: String,
        size: u64,
        #[serde(rename = "lastModified", skip_serializing_if = "Option::is_none")]
        last_modified: Option<DateTime<Utc>>,
    },
    Failure {
        #[serde(rename = "originalFile")]
        original_key: String,
        #[serde(rename = "error")]
        error_message: String,
        #[serde(rename = "errorKind")]
        error_kind: ErrorKind,
    },
}

impl ProcessingResult {
    pub fn success(descriptor: &ObjectDescriptor, decrypted_key: impl Into<String>) -> Self {
        ProcessingResult::Success {
            original_key: descriptor.key.clone(),
            decrypted_key: decrypted_key.into(),
            size: descriptor.size,
            last_modified: descriptor.last_modified,
        }
    }

    pub fn failure(descriptor: &ObjectDescriptor, error: &Error) -> Self {
        ProcessingResult::Failure {
            original_key: descriptor.key.clone(),
            error_message: error.message(),
            error_kind: error.kind(),
        }
    }

    pub fn original_key(&self) -> &str {
        match self {
            ProcessingResult::Success { original_key, .. }
            | ProcessingResult::Failure { original_key, .. } => original_key,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingResult::Success { .. })
    }
}

/// Counts plus the full ordered result list for one invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationSummary {
    pub total_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<ProcessingResult>,
}

impl InvocationSummary {
    /// Human-readable one-line summary
    pub fn message(&self) -> String {
        if self.total_count == 0 {
            return "No files found to process".to_string();
        }
        format!(
            "Processed {} file(s): {} succeeded, {} failed",
            self.total_count, self.success_count, self.failure_count
        )
    }
}

/// Fold per-object results into a summary. Pure; performs no I/O.
pub fn aggregate(results: Vec<ProcessingResult>) -> InvocationSummary {
    let success_count = results.iter().filter(|r| r.is_success()).count();
    InvocationSummary {
        total_count: results.len(),
        success_count,
        failure_count: results.len() - success_count,
        results,
    }
}
