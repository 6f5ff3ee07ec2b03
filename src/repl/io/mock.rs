//! # Mock I/O Implementations for Testing
//!
//! Scripted input lines and a shareable output buffer, so tests can drive
//! the console and inspect what it printed.

use super::LineSource;
use anyhow::Result;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Line source fed from a pre-programmed queue
#[derive(Debug, Default)]
pub struct MockLineSource {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl MockLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn pending_count(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for MockLineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

/// Output buffer whose clones all write to the same bytes
#[derive(Debug, Clone, Default)]
pub struct SharedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_source_should_yield_lines_then_none() {
        let mut source = MockLineSource::new(["one", "two"]);
        assert_eq!(source.read_line("> ").unwrap().as_deref(), Some("one"));
        assert_eq!(source.read_line("... ").unwrap().as_deref(), Some("two"));
        assert_eq!(source.read_line("> ").unwrap(), None);
        assert_eq!(source.prompts(), ["> ", "... ", "> "]);
    }

    #[test]
    fn shared_output_clones_should_share_buffer() {
        let output = SharedOutput::new();
        let mut writer = output.clone();
        write!(writer, "hello").unwrap();
        assert_eq!(output.contents(), "hello");

        output.clear();
        assert_eq!(output.contents(), "");
    }
}
