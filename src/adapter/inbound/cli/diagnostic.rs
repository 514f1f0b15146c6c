//! Miette-based error diagnostics for CLI error presentation.
//!
//! Turns crate errors into reports with source context for TOML problems and
//! a help line for the failures users can fix themselves.

use std::path::Path;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::error::{ConfigError, Error};

/// Configuration error pointing into the offending file.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(moverwatch::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

/// Any other command failure.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(moverwatch::command))]
pub struct CommandDiagnostic {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

/// Build the report printed when a command fails.
///
/// `config_path` is the file the command read, used to show TOML context.
#[must_use]
pub fn report(error: &Error, config_path: Option<&Path>) -> miette::Report {
    if let (Error::Config(ConfigError::Parse(parse)), Some(path)) = (error, config_path) {
        if let (Some(span), Ok(src)) = (parse.span(), std::fs::read_to_string(path)) {
            return miette::Report::new(ConfigDiagnostic {
                message: format!("invalid configuration in {}", path.display()),
                src,
                span: (span.start, span.end.saturating_sub(span.start)).into(),
                help: Some(parse.message().to_string()),
            });
        }
    }

    miette::Report::new(CommandDiagnostic {
        message: error.to_string(),
        help: help_for(error),
    })
}

fn help_for(error: &Error) -> Option<String> {
    match error {
        Error::Config(ConfigError::MissingField { field }) if field.starts_with("TELEGRAM_") => {
            Some(
                "set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID (a .env file works), \
                 or set [telegram] enabled = false"
                    .to_string(),
            )
        }
        Error::Config(ConfigError::ReadFile(_)) => {
            Some("create the file or pass a different path with --config".to_string())
        }
        Error::Config(_) => Some("run `moverwatch config validate` to check the file".to_string()),
        Error::Exchange(_) | Error::Http(_) => {
            Some("check your network connection and the exchange status".to_string())
        }
        Error::Notify(_) => Some("verify the bot token and that the bot can post in the chat".to_string()),
        Error::Cycle(_) => Some("run with -v for per-exchange details".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_telegram_token_has_help() {
        let error: Error = ConfigError::MissingField {
            field: "TELEGRAM_BOT_TOKEN",
        }
        .into();
        let help = help_for(&error).unwrap();
        assert!(help.contains("TELEGRAM_BOT_TOKEN"));
        assert!(help.contains("enabled = false"));
    }

    #[test]
    fn parse_error_points_into_file() {
        let content = "[report]\ngainer_limit = \n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();

        let parse = toml::from_str::<toml::Value>(content).unwrap_err();
        let error: Error = ConfigError::Parse(parse).into();
        let rendered = report(&error, Some(file.path()));

        assert!(rendered.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn other_errors_keep_message() {
        let error = Error::Cycle("all 3 exchanges failed".into());
        let rendered = report(&error, None);
        assert_eq!(
            rendered.to_string(),
            "report cycle failed: all 3 exchanges failed"
        );
    }
}
