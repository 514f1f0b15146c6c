//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, runtime wiring, and process signals.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`shutdown`] - Ctrl-C / SIGTERM handling

pub mod bootstrap;
pub mod config;
pub mod shutdown;
