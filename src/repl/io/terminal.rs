//! # Terminal I/O Implementation
//!
//! Line editing with history and tab completion when stdin is a terminal,
//! plain buffered reads otherwise (pipes, redirected files).

use super::LineSource;
use anyhow::{Context, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use std::io::{self, BufRead};

/// Words offered on tab
pub const COMPLETIONS: [&str; 13] = [
    ".help", ".headers", ".options", ".cookies", ".json", ".quit", "/", "GET", "POST", "PUT",
    "PATCH", "HEAD", "DELETE",
];

/// Completes meta-commands and verbs. Any word containing the typed text is
/// a candidate; with no match every word is offered.
#[derive(Debug, Clone, Default)]
pub struct ConsoleHelper;

impl ConsoleHelper {
    pub fn candidates(&self, input: &str) -> Vec<&'static str> {
        let hits: Vec<&'static str> = COMPLETIONS
            .into_iter()
            .filter(|word| word.contains(input))
            .collect();
        if hits.is_empty() {
            COMPLETIONS.to_vec()
        } else {
            hits
        }
    }
}

impl Helper for ConsoleHelper {}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = line.get(..pos).unwrap_or(line);
        let candidates = self
            .candidates(input)
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;
}

impl Highlighter for ConsoleHelper {}

impl Validator for ConsoleHelper {}

type ConsoleEditor = Editor<ConsoleHelper, DefaultHistory>;

pub struct TerminalLineSource {
    editor: Option<ConsoleEditor>,
}

impl TerminalLineSource {
    /// Use rustyline when stdin is a TTY
    pub fn new() -> Result<Self> {
        let editor = if atty::is(atty::Stream::Stdin) {
            let mut editor = ConsoleEditor::new().context("Failed to create line editor")?;
            editor.set_helper(Some(ConsoleHelper));
            Some(editor)
        } else {
            None
        };
        Ok(Self { editor })
    }
}

impl LineSource for TerminalLineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let Some(editor) = self.editor.as_mut() else {
            let mut line = String::new();
            let read = io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read input")?;
            if read == 0 {
                return Ok(None);
            }
            let line = line.trim_end_matches(['\r', '\n']).to_string();
            return Ok(Some(line));
        };

        match editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("Failed to read input: {e}")),
        }
    }

    fn is_interactive(&self) -> bool {
        self.editor.is_some()
    }
}
