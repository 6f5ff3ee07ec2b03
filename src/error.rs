//! # Console Errors
//!
//! Typed failures raised by the session components. Every one of them ends
//! the current command only; the run loop reports it and keeps prompting.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Connection refused, DNS failure, aborted transfer and the like
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Request did not finish within the fixed request timeout
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// A `Set-Cookie` value that could not be understood
    #[error("malformed cookie '{0}'")]
    MalformedCookie(String),

    /// The startup command file could not be read
    #[error("failed to read command file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid request url '{0}'")]
    InvalidUrl(String),
}

impl ConsoleError {
    /// Map a reqwest failure, singling out timeouts
    pub fn from_transport(err: reqwest::Error, timeout_ms: Option<u64>) -> Self {
        match timeout_ms {
            Some(duration_ms) if err.is_timeout() => ConsoleError::Timeout { duration_ms },
            _ => ConsoleError::Transport(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_cookie_should_name_the_offending_value() {
        let err = ConsoleError::MalformedCookie("garbage".to_string());
        assert_eq!(err.to_string(), "malformed cookie 'garbage'");
    }

    #[test]
    fn timeout_should_report_duration() {
        let err = ConsoleError::Timeout { duration_ms: 5000 };
        assert_eq!(err.to_string(), "request timed out after 5000ms");
    }

    #[test]
    fn config_error_should_include_path() {
        let err = ConsoleError::Config {
            path: PathBuf::from("/tmp/missing-rc"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing-rc"));
    }
}
