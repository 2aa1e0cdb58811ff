//! # unseal
//!
//! Decrypts PGP-encrypted objects under an S3 prefix and writes the
//! plaintext to a destination prefix in the same bucket.
//!
//! - [`pipeline::Pipeline`]: key resolution, listing, per-object fold
//! - [`worker::DecryptWorker`]: download, decrypt, upload for one object
//! - [`handler`]: Lambda runtime entry point
//! - [`aws`]: production client wiring

pub mod aws;
pub mod handler;
pub mod pipeline;
pub mod worker;

pub use pipeline::Pipeline;
pub use worker::{DecryptWorker, METADATA_DECRYPTED_FROM};
