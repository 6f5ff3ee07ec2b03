//! # Console Commands
//!
//! Turns one input line into one tagged command. Classification is a single
//! pass in fixed priority order:
//!
//! 1. `/...`  path set (`//` resets)
//! 2. `..`    path pop
//! 3. `.name` meta-command
//! 4. `\name` escape alias for a meta-command
//! 5. `Name: value` header directive
//! 6. `VERB [path][?query]` request
//! 7. anything else is unknown
//!
//! Header directives need a colon right after a letters-and-hyphens token and
//! verbs never contain one, so ordering alone keeps the two apart.

use std::fmt;

/// HTTP methods the console can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Head,
    Delete,
}

impl HttpVerb {
    pub const ALL: [HttpVerb; 6] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Patch,
        HttpVerb::Head,
        HttpVerb::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Head => "HEAD",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// POST, PUT and PATCH wait for a body line before sending
    pub fn takes_body(&self) -> bool {
        matches!(self, HttpVerb::Post | HttpVerb::Put | HttpVerb::Patch)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `.`-prefixed directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    /// `.h`, `.headers`: headers as they would be sent, cookies included
    Headers,
    /// `.default-headers`: stored headers only
    DefaultHeaders,
    /// `.o`, `.options`
    Options,
    /// `.c`, `.cookies`
    Cookies,
    /// `.help`
    Help,
    /// `.j`, `.json`: force a JSON content type
    Json,
    /// `.q`, `.quit`, `.exit`
    Quit,
    /// Anything else; ignored
    Unrecognized(String),
}

impl MetaCommand {
    pub fn parse(name: &str) -> Self {
        match name {
            "h" | "headers" => MetaCommand::Headers,
            "default-headers" => MetaCommand::DefaultHeaders,
            "o" | "options" => MetaCommand::Options,
            "c" | "cookies" => MetaCommand::Cookies,
            "help" => MetaCommand::Help,
            "j" | "json" => MetaCommand::Json,
            "exit" | "quit" | "q" => MetaCommand::Quit,
            other => MetaCommand::Unrecognized(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Blank line
    Empty,
    /// `/a/b`: append segments (text after the leading slash)
    PathSet(String),
    /// `//`
    PathReset,
    /// `..`
    PathPop,
    Meta(MetaCommand),
    HeaderSet { name: String, value: String },
    HeaderRemove { name: String },
    Request {
        verb: HttpVerb,
        /// Text after the verb, if any
        argument: Option<String>,
    },
    Unknown(String),
}

impl ConsoleCommand {
    /// Classify one (already trimmed) input line
    pub fn parse(line: &str) -> Self {
        if line.is_empty() {
            return ConsoleCommand::Empty;
        }

        if let Some(rest) = line.strip_prefix('/') {
            if rest == "/" {
                return ConsoleCommand::PathReset;
            }
            return ConsoleCommand::PathSet(rest.to_string());
        }

        if line == ".." {
            return ConsoleCommand::PathPop;
        }

        if let Some(name) = line.strip_prefix('.') {
            return ConsoleCommand::Meta(MetaCommand::parse(name));
        }

        if let Some(name) = line.strip_prefix('\\') {
            return ConsoleCommand::Meta(MetaCommand::parse(name));
        }

        if let Some((name, value)) = parse_header_directive(line) {
            return if value.is_empty() {
                ConsoleCommand::HeaderRemove {
                    name: name.to_string(),
                }
            } else {
                ConsoleCommand::HeaderSet {
                    name: name.to_string(),
                    value: value.to_string(),
                }
            };
        }

        if let Some((verb, argument)) = parse_request_line(line) {
            return ConsoleCommand::Request { verb, argument };
        }

        ConsoleCommand::Unknown(line.to_string())
    }
}

/// `Name: value` where the name is letters and hyphens only
fn parse_header_directive(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let valid_name =
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
    valid_name.then(|| (name, value.trim_start()))
}

/// Match a leading HTTP verb on a word boundary. Returns the verb and the
/// remainder with whitespace runs collapsed, `None` when nothing follows.
pub fn parse_request_line(line: &str) -> Option<(HttpVerb, Option<String>)> {
    HttpVerb::ALL.into_iter().find_map(|verb| {
        let token = verb.as_str();
        let head = line.get(..token.len())?;
        if !head.eq_ignore_ascii_case(token) {
            return None;
        }

        let rest = &line[token.len()..];
        if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
            return None;
        }

        let words: Vec<&str> = rest.split_whitespace().collect();
        Some((verb, (!words.is_empty()).then(|| words.join(" "))))
    })
}

/// Whether the line would issue a request; such lines are skipped when a
/// command file is replayed at startup.
pub fn is_request_line(line: &str) -> bool {
    parse_request_line(line.trim()).is_some()
}
