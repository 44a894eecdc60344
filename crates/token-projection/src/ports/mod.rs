//! # Ports Module
//!
//! Hexagonal architecture ports (inbound read API, outbound dependencies).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
