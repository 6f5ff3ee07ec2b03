//! # I/O Abstraction Layer
//!
//! The console reads lines from a `LineSource` and writes to any
//! `std::io::Write`, so the interpreter runs the same against a terminal or
//! against scripted input in tests.
//!
//! ```text
//! Production:  Console ──▶ TerminalLineSource ──▶ rustyline / stdin
//!                      ──▶ io::Stdout
//!
//! Testing:     Console ──▶ MockLineSource     ──▶ VecDeque<String>
//!                      ──▶ SharedOutput       ──▶ Arc<Mutex<Vec<u8>>>
//! ```

use anyhow::Result;

pub mod mock;
pub mod terminal;

pub use mock::{MockLineSource, SharedOutput};
pub use terminal::TerminalLineSource;

/// Source of input lines
pub trait LineSource {
    /// Read the next line, showing `prompt` when interactive.
    ///
    /// Returns `Ok(None)` once input is exhausted or the user hung up.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Whether prompts and the welcome banner should be shown
    fn is_interactive(&self) -> bool {
        false
    }
}
