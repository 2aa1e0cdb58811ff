//! Invocation response envelope

use crate::error::Error;
use crate::types::{InvocationSummary, ProcessingResult};
use serde::Serialize;

/// HTTP-style status for a completed run, partial failures included
pub const STATUS_OK: u16 = 200;
/// Status for a run aborted before or during listing
pub const STATUS_ERROR: u16 = 500;

/// `{ statusCode, body }` returned from every invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ProcessingResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InvocationResponse {
    /// 200 response carrying the summary
    pub fn from_summary(summary: InvocationSummary) -> Self {
        Self {
            status_code: STATUS_OK,
            body: ResponseBody {
                message: summary.message(),
                total_count: Some(summary.total_count),
                success_count: Some(summary.success_count),
                failure_count: Some(summary.failure_count),
                results: Some(summary.results),
                error: None,
            },
        }
    }

    /// 500 response for an aborted invocation
    pub fn from_error(error: &Error) -> Self {
        Self {
            status_code: STATUS_ERROR,
            body: ResponseBody {
                message: "Error processing files".to_string(),
                total_count: None,
                success_count: None,
                failure_count: None,
                results: None,
                error: Some(error.to_string()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}
