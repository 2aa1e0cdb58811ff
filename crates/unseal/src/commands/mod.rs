//! Command implementations

pub mod lambda;
pub mod run;
