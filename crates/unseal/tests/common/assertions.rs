//! Assertion helpers for pipeline results

use unseal_core::{ErrorKind, InvocationSummary, ProcessingResult};

/// Assert a success result for `original` written to `decrypted`
pub fn assert_success(result: &ProcessingResult, original: &str, decrypted: &str) {
    match result {
        ProcessingResult::Success {
            original_key,
            decrypted_key,
            ..
        } => {
            assert_eq!(original_key, original);
            assert_eq!(decrypted_key, decrypted);
        }
        other => panic!("Expected success for {}, got {:?}", original, other),
    }
}

/// Assert a failure result for `original` whose message contains `needle`
pub fn assert_failure(result: &ProcessingResult, original: &str, kind: ErrorKind, needle: &str) {
    match result {
        ProcessingResult::Failure {
            original_key,
            error_message,
            error_kind,
        } => {
            assert_eq!(original_key, original);
            assert_eq!(*error_kind, kind);
            assert!(
                error_message.contains(needle),
                "Failure message {:?} does not contain {:?}",
                error_message,
                needle
            );
        }
        other => panic!("Expected failure for {}, got {:?}", original, other),
    }
}

/// Assert the summary counts
pub fn assert_counts(summary: &InvocationSummary, total: usize, succeeded: usize, failed: usize) {
    assert_eq!(
        (summary.total_count, summary.success_count, summary.failure_count),
        (total, succeeded, failed),
        "Unexpected counts in summary: {}",
        summary.message()
    );
}
