//! # Token Projection Test Suite
//!
//! Unified test crate driving the engine end to end.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs    # Fold behaviour through TokenSyncService
//!     ├── lifecycle.rs    # Bootstrap, retry, shutdown, rehydration
//!     └── properties.rs   # proptest invariants over event sequences
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p projection-tests
//! cargo test -p projection-tests integration::properties
//! ```

pub mod integration;
