//! # Services Layer
//!
//! Network-facing work of the console: sending requests and turning the
//! buffered response bytes into text.

pub mod body;
pub mod http;

pub use body::decode_body;
pub use http::{encode_path, HttpService, OutgoingRequest};
