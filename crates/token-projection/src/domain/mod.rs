//! # Domain Module
//!
//! Core domain types for the token projection.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
