//! Session model
//!
//! All mutable state of one console invocation: where we are, what we send,
//! what we remember, and whether a request is waiting for its body.

use crate::config::ConsoleOptions;
use crate::repl::command::HttpVerb;

use super::{CookieJar, HeaderStore, PathStack};

/// A body-carrying request whose body line has not arrived yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub method: HttpVerb,
    pub path: String,
}

/// Interpreter state derived from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterState {
    Idle,
    AwaitingBody,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub host: String,
    pub port: u16,
    pub options: ConsoleOptions,
    pub path: PathStack,
    pub headers: HeaderStore,
    pub cookies: CookieJar,
    pending: Option<PendingRequest>,
}

impl Session {
    pub fn new(host: impl Into<String>, port: u16, options: ConsoleOptions) -> Self {
        let headers = HeaderStore::from_options(&options);
        Self {
            host: host.into(),
            port,
            options,
            path: PathStack::new(),
            headers,
            cookies: CookieJar::new(),
            pending: None,
        }
    }

    pub fn state(&self) -> InterpreterState {
        match self.pending {
            Some(_) => InterpreterState::AwaitingBody,
            None => InterpreterState::Idle,
        }
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    /// Park a request until its body line arrives
    pub fn await_body(&mut self, method: HttpVerb, path: impl Into<String>) {
        let pending = PendingRequest {
            method,
            path: path.into(),
        };
        tracing::debug!("Awaiting body for {} {}", pending.method, pending.path);
        self.pending = Some(pending);
    }

    pub fn take_pending(&mut self) -> Option<PendingRequest> {
        self.pending.take()
    }

    /// `scheme://host:port`
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.options.scheme(), self.host, self.port)
    }
}
