//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving side: the command-line interface
//! - [`outbound`] - Driven side: exchange clients, notifiers, snapshot store

pub mod inbound;
pub mod outbound;
