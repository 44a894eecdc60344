//! # Projection Runtime Library
//!
//! Process wiring for the token projection. The main entry point is the
//! `main.rs` binary; the pieces are exposed here for testing.
//!
//! ## Replay Flow
//!
//! ```text
//! TP_FIXTURE ──→ FixtureTokenManager / FixtureToken
//!                          │
//! TP_SNAPSHOT_PATH ──→ TokenSyncService::start ──→ bootstrap + publish
//!                          │
//! TP_EVENT_LOG ──→ JsonLinesEventSource ──→ run_with ──→ counters
//!                          │
//!                     final snapshot saved
//! ```

#![warn(missing_docs)]

pub mod adapters;
pub mod config;
pub mod runtime;

pub use config::{ConfigError, RuntimeConfig};
pub use runtime::{replay, ReplayReport};
