//! # Algorithms
//!
//! Pure classification of inbound events.

pub mod normalizer;

pub use normalizer::{normalize, WatchedContracts};
