//! Common test utilities for unseal
//!
//! Provides shared test infrastructure for pipeline testing including:
//! - In-memory object store and scripted decryptor
//! - Key source and settings fixtures
//! - Result assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
pub use fixtures::*;
pub use mocks::*;
