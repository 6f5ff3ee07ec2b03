//! Response model
//!
//! A fully buffered HTTP response: status, headers in arrival order and the
//! decoded body text. Display concerns live in the views.

use super::header_store::HeaderList;

/// Display bucket of a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Below 300
    Success,
    /// 300..400
    Redirect,
    /// 400..500
    ClientError,
    /// 500 and up
    ServerError,
}

impl StatusClass {
    pub fn of(code: u16) -> Self {
        match code {
            500.. => StatusClass::ServerError,
            400..=499 => StatusClass::ClientError,
            300..=399 => StatusClass::Redirect,
            _ => StatusClass::Success,
        }
    }
}

/// HTTP response status information
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseStatus {
    pub code: u16,
    pub reason: String,
}

impl ResponseStatus {
    /// Create a new response status
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn class(&self) -> StatusClass {
        StatusClass::of(self.code)
    }

    /// Get status as string (e.g., "200 OK")
    pub fn as_string(&self) -> String {
        if self.reason.is_empty() {
            self.code.to_string()
        } else {
            format!("{} {}", self.code, self.reason)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseModel {
    /// e.g. `HTTP/1.1`
    pub version: String,
    pub status: ResponseStatus,
    /// Header names as received, one entry per value
    pub headers: HeaderList,
    pub body: String,
    pub duration_ms: u64,
}

impl ResponseModel {
    pub fn new(version: impl Into<String>, status: ResponseStatus) -> Self {
        Self {
            version: version.into(),
            status,
            headers: Vec::new(),
            body: String::new(),
            duration_ms: 0,
        }
    }

    /// First value of a header, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every `Set-Cookie` value, in arrival order
    pub fn set_cookies(&self) -> impl Iterator<Item = &str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("set-cookie"))
            .map(|(_, v)| v.as_str())
    }

    /// `HTTP/1.1 200 OK`
    pub fn status_line(&self) -> String {
        format!("{} {}", self.version, self.status.as_string())
    }
}
