//! Astral-style CLI output formatting.
//!
//! Provides consistent terminal output with support for JSON mode (for
//! scripting), quiet mode, and verbosity levels. Colors follow the
//! `--color` flag and are dropped when stdout is not a terminal.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use super::command::ColorChoice;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }

    /// Log level directive implied by `-q` / `-v`, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<&'static str> {
        match (self.quiet, self.verbose) {
            (true, _) => Some("warn"),
            (false, 0) => None,
            (false, 1) => Some("debug"),
            (false, _) => Some("trace"),
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_config(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

/// Route one output event: a tagged JSON line in JSON mode, otherwise the
/// human rendering unless quiet mode hides it.
fn emit(kind: &str, payload: serde_json::Value, always: bool, human: impl FnOnce()) {
    let config = read_config();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if always || !regular_output_suppressed(config) {
        human();
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig, color: &ColorChoice) {
    match color {
        ColorChoice::Auto => owo_colors::unset_override(),
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
    write_config(config);
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Return whether quiet mode is enabled.
#[must_use]
pub fn is_quiet() -> bool {
    read_config().quiet
}

/// Print the application name and version.
pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "moverwatch", "version": version }),
        false,
        || {
            println!(
                "{} {}",
                "moverwatch".if_supports_color(Stream::Stdout, |t| t.bold()),
                version.if_supports_color(Stream::Stdout, |t| t.dimmed())
            );
            println!();
        },
    );
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        false,
        || {
            println!(
                "  {:<16} {}",
                label.if_supports_color(Stream::Stdout, |t| t.dimmed()),
                value
            );
        },
    );
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), false, || {
        println!(
            "  {} {}",
            "✓".if_supports_color(Stream::Stdout, |t| t.green()),
            message
        );
    });
}

/// Print a warning. Shown even in quiet mode.
pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), true, || {
        println!(
            "  {} {}",
            "⚠".if_supports_color(Stream::Stdout, |t| t.yellow()),
            message
        );
    });
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), false, || {
        println!();
        println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
    });
}

/// Print a hint with "hint:" prefix.
pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), false, || {
        println!(
            "  {}: {}",
            "hint".if_supports_color(Stream::Stdout, |t| t.cyan()),
            message.if_supports_color(Stream::Stdout, |t| t.dimmed())
        );
    });
}

/// Print an action in progress ("Sending...").
pub fn action(verb: &str, target: &str) {
    emit(
        "action",
        json!({ "verb": verb, "target": target, "status": "in_progress" }),
        false,
        || {
            println!(
                "  {} {}...",
                verb.if_supports_color(Stream::Stdout, |t| t.cyan()),
                target
            );
        },
    );
}

/// Print a completed action ("✓ Sent ...").
pub fn action_done(verb: &str, target: &str) {
    emit(
        "action",
        json!({ "verb": verb, "target": target, "status": "done" }),
        false,
        || {
            println!(
                "  {} {} {}",
                "✓".if_supports_color(Stream::Stdout, |t| t.green()),
                verb.if_supports_color(Stream::Stdout, |t| t.green()),
                target
            );
        },
    );
}

/// Print a pre-formatted block verbatim. Human mode only.
pub fn block(content: &str) {
    let config = read_config();
    if !config.json && !config.quiet {
        println!("{content}");
    }
}

/// Emit a JSON document as a single line.
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}

fn paint(value: impl Display, color: impl Fn(&String) -> String) -> String {
    let value = value.to_string();
    if is_json() {
        value
    } else {
        color(&value)
    }
}

/// Green text for gains.
pub fn positive(value: impl Display) -> String {
    paint(value, |v| {
        v.if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    })
}

/// Red text for losses.
pub fn negative(value: impl Display) -> String {
    paint(value, |v| {
        v.if_supports_color(Stream::Stdout, |t| t.red()).to_string()
    })
}

fn padded(cells: impl Iterator<Item = (String, usize)>) -> String {
    let mut line = String::from("  ");
    for (cell, width) in cells {
        line.push_str(&format!("{cell:<width$} "));
    }
    line.trim_end().to_string()
}

/// Print a table header row.
pub fn table_header(columns: &[(&str, usize)]) {
    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    emit("table_header", json!({ "columns": names }), false, || {
        let line = padded(columns.iter().map(|(name, w)| ((*name).to_string(), *w)));
        println!("{}", line.if_supports_color(Stream::Stdout, |t| t.dimmed()));
    });
}

/// Print a table data row.
///
/// Keep colored cells last; escape codes count toward the padding width.
pub fn table_row(cells: &[String], widths: &[usize]) {
    emit("table_row", json!({ "cells": cells }), false, || {
        println!(
            "{}",
            padded(cells.iter().cloned().zip(widths.iter().copied()))
        );
    });
}

const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Create and start a progress spinner.
///
/// Returns a hidden progress bar in JSON or quiet mode.
pub fn spinner(message: &str) -> indicatif::ProgressBar {
    let config = read_config();
    if config.json || config.quiet {
        let pb = indicatif::ProgressBar::hidden();
        pb.set_message(message.to_string());
        return pb;
    }

    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner()
        .tick_strings(BRAILLE_SPINNER)
        .template("  {spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success checkmark.
pub fn spinner_success(pb: &indicatif::ProgressBar, message: &str) {
    let config = read_config();
    if config.json {
        println!("{}", json!({ "type": "spinner_success", "payload": { "message": message } }));
        pb.finish_and_clear();
        return;
    }
    if config.quiet {
        pb.finish_and_clear();
        return;
    }

    pb.finish_with_message(format!(
        "{} {}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green()),
        message
    ));
}

/// Finish a spinner with a failure mark.
pub fn spinner_fail(pb: &indicatif::ProgressBar, message: &str) {
    let config = read_config();
    if config.json {
        println!("{}", json!({ "type": "spinner_fail", "payload": { "message": message } }));
        pb.finish_and_clear();
        return;
    }

    pb.finish_with_message(format!(
        "{} {}",
        "×".if_supports_color(Stream::Stdout, |t| t.red()),
        message
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_follows_flags() {
        assert_eq!(OutputConfig::new(false, false, 0).log_level(), None);
        assert_eq!(OutputConfig::new(false, false, 1).log_level(), Some("debug"));
        assert_eq!(OutputConfig::new(false, false, 3).log_level(), Some("trace"));
        assert_eq!(OutputConfig::new(false, true, 2).log_level(), Some("warn"));
    }

    #[test]
    fn padded_aligns_cells_and_trims_the_tail() {
        let line = padded(
            vec![("1.".to_string(), 4), ("BTC".to_string(), 6)].into_iter(),
        );
        assert_eq!(line, "  1.   BTC");
    }

    #[test]
    fn quiet_suppresses_only_human_output() {
        assert!(regular_output_suppressed(OutputConfig::new(false, true, 0)));
        assert!(!regular_output_suppressed(OutputConfig::new(true, true, 0)));
        assert!(!regular_output_suppressed(OutputConfig::new(false, false, 0)));
    }
}
