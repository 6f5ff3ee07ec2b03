//! # Console REPL
//!
//! - **command**: line tokenizer producing one tagged command per line
//! - **models**: session state (path stack, headers, cookie jar, pending request)
//! - **services**: request execution and body decoding
//! - **views**: rendering of responses, listings, warnings and errors
//! - **controller**: the interpreter loop tying them together
//! - **io**: line source abstraction with terminal and mock implementations

pub mod command;
pub mod controller;
pub mod io;
pub mod models;
pub mod services;
pub mod views;

pub use command::{ConsoleCommand, HttpVerb, MetaCommand};
pub use controller::{Console, ExecOutcome};
pub use models::{CookieJar, HeaderStore, InterpreterState, PathStack, Session};
