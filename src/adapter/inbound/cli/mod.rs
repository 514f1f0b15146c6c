//! CLI module graph.

pub mod check;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod dispatch;
pub mod output;
pub mod paths;
pub mod run;
pub mod schedule;
pub mod stats;
