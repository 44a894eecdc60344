//! Cross-crate integration tests and the fixtures they share.

pub mod harness;
pub mod lifecycle;
pub mod properties;
pub mod scenarios;
