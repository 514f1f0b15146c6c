//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: exchanges,
//! snapshot storage, and notifications.

pub mod exchange;
pub mod notifier;
pub mod snapshot;
