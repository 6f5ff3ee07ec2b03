//! # Models Module
//!
//! Session state of the console: path, headers, cookies, the pending
//! request, and buffered responses.

pub mod cookie_jar;
pub mod header_store;
pub mod path_stack;
pub mod response_model;
pub mod session;

pub use cookie_jar::{Cookie, CookieAttribute, CookieJar};
pub use header_store::{HeaderList, HeaderStore};
pub use path_stack::PathStack;
pub use response_model::{ResponseModel, ResponseStatus, StatusClass};
pub use session::{InterpreterState, PendingRequest, Session};
