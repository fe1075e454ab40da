//! Wire protocol for the traffic simulation stream.
//!
//! This crate defines:
//! - Camera/viewport state and its translation into query bounds
//! - Entity types delivered per tick (agents, emissions, traffic lights)
//! - The tagged client/server message enums for `/ws/traffic`
//! - Tolerant message decoding that distinguishes broken JSON, unknown
//!   message types, and bad payloads

pub mod entities;
pub mod messages;
pub mod viewport;

pub use entities::*;
pub use messages::*;
pub use viewport::*;
