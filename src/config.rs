//! Configuration constants and session options for http-console
//!
//! Options are fixed at startup and each field gates exactly one behavior
//! of the console.

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

/// Host used when none is given on the command line
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when a bare host is given and TLS is off
pub const DEFAULT_PORT: u16 = 8080;

/// Port used for an explicit `http://` target without a port
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Port used when none is given and TLS is on
pub const DEFAULT_SSL_PORT: u16 = 443;

/// Request timeout applied when the `timeout` option is on
pub const REQUEST_TIMEOUT_MS: u64 = 5000;

/// Environment variable naming a command file to replay at startup
pub const RC_PATH_ENV_VAR: &str = "HTTP_CONSOLE_RC";

/// Environment variable holding the tracing filter
pub const LOG_ENV_VAR: &str = "HTTP_CONSOLE_LOG";

/// Basic-auth credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    #[serde(serialize_with = "mask")]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse `user:pass`. A missing colon means an empty password.
    pub fn parse(value: &str) -> Self {
        match value.split_once(':') {
            Some((user, pass)) => Self::new(user, pass),
            None => Self::new(value, ""),
        }
    }
}

fn mask<S: Serializer>(_value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("****")
}

/// Options bundle the console session is built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleOptions {
    /// Echo the outgoing request line, headers and body
    pub verbose: bool,
    /// Send and accept `application/json`
    pub json: bool,
    /// Basic-auth credentials, turned into an `Authorization` header
    pub auth: Option<Credentials>,
    /// Talk TLS instead of plain TCP
    #[serde(rename = "useSSL")]
    pub use_ssl: bool,
    /// Capture `Set-Cookie` into the cookie jar
    pub remember_cookies: bool,
    /// Abort requests after `REQUEST_TIMEOUT_MS`
    pub timeout: bool,
    /// Commands replayed at startup (request lines are skipped)
    pub config_file: Option<PathBuf>,
}

impl ConsoleOptions {
    /// The request timeout, if enabled
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout.then(|| Duration::from_millis(REQUEST_TIMEOUT_MS))
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_ssl {
            "https"
        } else {
            "http"
        }
    }
}

/// Resolve the startup command file: explicit path first, then the
/// environment variable. `~` and `$VARS` are expanded.
pub fn get_rc_path(explicit: Option<&str>) -> Option<PathBuf> {
    let raw = match explicit {
        Some(path) => path.to_string(),
        None => std::env::var_os(RC_PATH_ENV_VAR).and_then(|val| val.into_string().ok())?,
    };

    if raw.trim().is_empty() {
        return None;
    }

    let expanded = match shellexpand::full(&raw) {
        Ok(path) => path.into_owned(),
        Err(e) => {
            tracing::warn!("Could not expand command file path '{}': {}", raw, e);
            raw
        }
    };
    Some(PathBuf::from(expanded))
}
