//! Error taxonomy for block execution.
//!
//! Construction-time failures (`UnsupportedLanguage`, `Configuration`) are
//! terminal for a single run and never corrupt the owning session.
//! Execution-time failures keep their original cause as a `source` so callers
//! can diagnose without re-running.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building or running an executable.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// No executable could be built for the block's language tag.
    ///
    /// Recoverable: the caller may skip the block or report it. Distinct from
    /// an empty language tag, which yields no executable at all rather than
    /// an error.
    #[error("unsupported language {language:?}")]
    UnsupportedLanguage { language: String },

    /// The underlying process could not be started.
    #[error("failed to spawn {command:?} in {dir}")]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The process ran and exited non-zero, or was terminated by a signal.
    ///
    /// Surfaced as the call's result, never a panic. A signal termination is
    /// reported as 128 + signal number.
    #[error("block {name:?} exited with code {code}")]
    Execution { name: String, code: i32 },

    /// A required runner option is missing or invalid. Indicates a
    /// programmer error in setup, not a runtime condition.
    #[error("invalid runner configuration: {message}")]
    Configuration { message: String },

    /// Dialing or writing the background-shell socket failed.
    ///
    /// Recoverable: the caller decides whether to fall back to direct
    /// execution.
    #[error("background shell socket {path} unavailable")]
    Socket {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunnerError {
    /// Shorthand for a [`RunnerError::Configuration`] with a formatted message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the process exit code when this error carries one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Execution { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
