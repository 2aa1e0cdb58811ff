//! # unseal-core
//!
//! Core library for unseal providing:
//! - Invocation settings read from the environment
//! - The error taxonomy shared by every crate
//! - The pipeline data model and the pure result aggregator
//! - Destination key naming

pub mod config;
pub mod error;
pub mod naming;
pub mod response;
pub mod types;

pub use config::{KeySettings, Settings};
pub use error::{Error, ErrorKind, Result};
pub use naming::DestinationNamer;
pub use response::InvocationResponse;
pub use types::{aggregate, InvocationSummary, ObjectDescriptor, ProcessingResult};
