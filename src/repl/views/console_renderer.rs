//! # Console Renderer
//!
//! Everything the console prints goes through here: responses, header and
//! cookie listings, the request echo in verbose mode, warnings and errors.

use anyhow::Result;
use colored::{Color, Colorize};
use serde_json::Value;
use std::fmt::Display;
use std::io::Write;

use crate::repl::models::{ResponseModel, StatusClass};
use crate::repl::services::OutgoingRequest;

pub const HELP_TEXT: [(&str, &str); 6] = [
    (".h[eaders]", "show active request headers."),
    (".o[ptions]", "show options."),
    (".c[ookies]", "show client cookies."),
    (".j[son]", "set 'Content-Type' header to 'application/json'."),
    (".help", "display this message."),
    (".q[uit]", "exit console."),
];

/// Color used for a status line of the given class
pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Success => Color::Green,
        StatusClass::Redirect => Color::Cyan,
        StatusClass::ClientError => Color::Yellow,
        StatusClass::ServerError => Color::Red,
    }
}

/// Uppercase every lowercase ASCII letter that starts a word:
/// `content-type` -> `Content-Type`
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_boundary = true;
    for ch in name.chars() {
        if at_boundary && ch.is_ascii_lowercase() {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        at_boundary = !(ch.is_alphanumeric() || ch == '_');
    }
    out
}

/// How a response body is shown
#[derive(Debug, Clone, PartialEq)]
pub enum BodyView {
    /// Parsed JSON, pretty-printed
    Structured(Value),
    /// Trimmed raw text, printed verbatim
    Text(String),
}

impl BodyView {
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::String(text)) => BodyView::Text(text),
            Ok(value) => BodyView::Structured(value),
            Err(_) => BodyView::Text(body.trim().to_string()),
        }
    }
}

/// Renders console output onto any writer
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn welcome(&mut self, host: &str, port: u16) -> Result<()> {
        let title = format!("http-console {}", env!("CARGO_PKG_VERSION"));
        writeln!(self.out, "> {}", title.bold())?;
        writeln!(self.out, "> Welcome, enter .help if you're lost.")?;
        writeln!(self.out, "> Connecting to {host} on port {port}.")?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn help(&mut self) -> Result<()> {
        for (command, description) in HELP_TEXT {
            writeln!(self.out, "{:<12} {}", command, description.bright_black())?;
        }
        Ok(())
    }

    /// Status line, headers, blank line, body
    pub fn response(&mut self, response: &ResponseModel) -> Result<()> {
        let color = status_color(response.status.class());
        writeln!(self.out, "{}", response.status_line().bold().color(color))?;

        self.headers(
            response
                .headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )?;
        writeln!(self.out)?;

        match BodyView::from_body(&response.body) {
            BodyView::Structured(value) => self.structured(&value)?,
            BodyView::Text(text) if !text.is_empty() => writeln!(self.out, "{}", text.white())?,
            BodyView::Text(_) => {}
        }

        self.out.flush()?;
        Ok(())
    }

    /// One `Name: value` line per header, names title-cased
    pub fn headers<'a>(&mut self, headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<()> {
        for (name, value) in headers {
            writeln!(self.out, "{}: {}", title_case(name).bold(), value)?;
        }
        Ok(())
    }

    /// Pretty-print a structured value
    pub fn structured(&mut self, value: &Value) -> Result<()> {
        let pretty = serde_json::to_string_pretty(value)?;
        writeln!(self.out, "{pretty}")?;
        Ok(())
    }

    /// Verbose echo of an outgoing request
    pub fn request_echo(&mut self, request: &OutgoingRequest) -> Result<()> {
        let line = format!("{} {}", request.verb, request.path);
        writeln!(self.out, "> {}", line.bright_black())?;
        for (name, value) in &request.headers {
            writeln!(self.out, "{}", format!("{name}: {value}").bright_black())?;
        }
        writeln!(self.out)?;
        if let Some(body) = &request.body {
            writeln!(self.out, "{}", body.bright_black())?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn warning(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.out, "{}", message.to_string().yellow().bold())?;
        Ok(())
    }

    pub fn error(&mut self, error: impl Display) -> Result<()> {
        writeln!(self.out, "{}", error.to_string().red())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::models::ResponseStatus;

    fn plain_renderer() -> ConsoleRenderer<Vec<u8>> {
        colored::control::set_override(false);
        ConsoleRenderer::new(Vec::new())
    }

    fn output(renderer: ConsoleRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn title_case_should_capitalize_word_starts() {
        assert_eq!(title_case("content-type"), "Content-Type");
        assert_eq!(title_case("x-request-id"), "X-Request-Id");
        assert_eq!(title_case("ETag"), "ETag");
        assert_eq!(title_case("www-authenticate"), "Www-Authenticate");
    }

    #[test]
    fn status_classes_should_map_to_colors() {
        assert_eq!(status_color(StatusClass::of(200)), Color::Green);
        assert_eq!(status_color(StatusClass::of(302)), Color::Cyan);
        assert_eq!(status_color(StatusClass::of(404)), Color::Yellow);
        assert_eq!(status_color(StatusClass::of(502)), Color::Red);
    }

    #[test]
    fn body_view_should_prefer_json() {
        assert_eq!(
            BodyView::from_body("{\"a\":1}"),
            BodyView::Structured(serde_json::json!({"a": 1}))
        );
        assert_eq!(
            BodyView::from_body("  plain text \n"),
            BodyView::Text("plain text".to_string())
        );
        assert_eq!(
            BodyView::from_body("\"quoted\""),
            BodyView::Text("quoted".to_string())
        );
    }

    #[test]
    fn response_should_render_status_headers_and_json_body() {
        let mut renderer = plain_renderer();
        let mut response = ResponseModel::new("HTTP/1.1", ResponseStatus::new(200, "OK"));
        response.headers = vec![("content-type".to_string(), "application/json".to_string())];
        response.body = "{\"id\":7}".to_string();

        renderer.response(&response).unwrap();
        let text = output(renderer);

        assert!(text.starts_with("HTTP/1.1 200 OK\n"));
        assert!(text.contains("Content-Type: application/json\n"));
        assert!(text.contains("\"id\": 7"));
    }

    #[test]
    fn empty_body_should_print_nothing_after_headers() {
        let mut renderer = plain_renderer();
        let response = ResponseModel::new("HTTP/1.1", ResponseStatus::new(204, "No Content"));

        renderer.response(&response).unwrap();
        assert_eq!(output(renderer), "HTTP/1.1 204 No Content\n\n");
    }

    #[test]
    fn help_should_list_every_meta_command() {
        let mut renderer = plain_renderer();
        renderer.help().unwrap();
        let text = output(renderer);
        for (command, _) in HELP_TEXT {
            assert!(text.contains(command));
        }
    }
}
