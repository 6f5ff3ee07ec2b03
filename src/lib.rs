//! # http-console - Interactive HTTP Console
//!
//! A line-oriented console for talking HTTP to one host. Navigate paths like
//! a filesystem, keep headers and cookies across requests, and read
//! responses with JSON bodies pretty-printed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  line   ┌──────────────┐  request   ┌─────────────┐
//! │ LineSource  │────────▶│   Console    │───────────▶│ HttpService │
//! │             │         │              │◀───────────│             │
//! │ - rustyline │         │ - tokenizer  │  response  └─────────────┘
//! │ - mock      │         │ - Session    │
//! └─────────────┘         └──────┬───────┘
//!                                │ render
//!                                ▼
//!                        ┌──────────────────┐
//!                        │ ConsoleRenderer  │
//!                        └──────────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod error;
pub mod repl;

// Re-export main types for easy access
pub use error::ConsoleError;
pub use repl::*;
