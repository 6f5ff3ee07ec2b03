//! # Views Module
//!
//! Presentation of console output.

pub mod console_renderer;

pub use console_renderer::{status_color, title_case, BodyView, ConsoleRenderer, HELP_TEXT};
