//! # Console Controller
//!
//! The interpreter: reads a line, classifies it, applies it to the session,
//! and for request lines drives the HTTP service and renders the result.
//! One line is fully resolved, network round trip included, before the next
//! one is read.

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::config::ConsoleOptions;
use crate::error::ConsoleError;
use crate::repl::command::{is_request_line, ConsoleCommand, HttpVerb, MetaCommand};
use crate::repl::io::LineSource;
use crate::repl::models::header_store::{APPLICATION_JSON, CONTENT_TYPE};
use crate::repl::models::{ResponseModel, Session};
use crate::repl::services::{HttpService, OutgoingRequest};
use crate::repl::views::ConsoleRenderer;

/// Prompt shown while a request waits for its body
pub const BODY_PROMPT: &str = "... ";

/// What the run loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    Continue,
    Quit,
}

pub struct Console<LS: LineSource, W: Write> {
    session: Session,
    http: HttpService,
    renderer: ConsoleRenderer<W>,
    line_source: LS,
    last_response: Option<ResponseModel>,
}

impl<LS: LineSource, W: Write> Console<LS, W> {
    /// Create a console for `host:port` with injected input and output
    pub fn new(
        host: impl Into<String>,
        port: u16,
        options: ConsoleOptions,
        line_source: LS,
        out: W,
    ) -> Result<Self> {
        let http = HttpService::new(&options)?;
        let session = Session::new(host, port, options);
        tracing::debug!("Console created for {}", session.origin());

        Ok(Self {
            session,
            http,
            renderer: ConsoleRenderer::new(out),
            line_source,
            last_response: None,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn line_source(&self) -> &LS {
        &self.line_source
    }

    /// The most recent response, if any request succeeded yet
    pub fn last_response(&self) -> Option<&ResponseModel> {
        self.last_response.as_ref()
    }

    /// `http://host:port/path> ` when idle, `... ` while awaiting a body
    pub fn prompt(&self) -> String {
        if self.session.pending().is_some() {
            return BODY_PROMPT.to_string();
        }
        format!("{}{}> ", self.session.origin(), self.session.path.render())
    }

    /// Run until end of input or a quit command
    pub async fn run(&mut self) -> Result<()> {
        if self.line_source.is_interactive() {
            self.renderer.welcome(&self.session.host, self.session.port)?;
        }

        if let Some(path) = self.session.options.config_file.clone() {
            if let Err(e) = self.replay(&path).await {
                self.renderer.error(format!("{e:#}"))?;
            }
        }

        loop {
            let prompt = self.prompt();
            let Some(line) = self.line_source.read_line(&prompt)? else {
                tracing::debug!("Input closed");
                break;
            };

            match self.exec(&line).await {
                Ok(ExecOutcome::Continue) => {}
                Ok(ExecOutcome::Quit) => break,
                Err(e) => {
                    tracing::error!("Command failed: {e:#}");
                    self.renderer.error(format!("{e:#}"))?;
                }
            }
            self.renderer.flush()?;
        }

        self.renderer.line("")?;
        self.renderer.flush()?;
        Ok(())
    }

    /// Replay a command file. Request lines are skipped so that startup
    /// never touches the network. Returns the number of lines executed.
    pub async fn replay(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path).map_err(|source| ConsoleError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Replaying commands from {}", path.display());

        let mut executed = 0;
        for line in content.lines().map(str::trim) {
            if is_request_line(line) {
                tracing::debug!("Skipping request line during replay: {}", line);
                continue;
            }
            match self.exec(line).await {
                Ok(ExecOutcome::Quit) => break,
                Ok(ExecOutcome::Continue) => executed += 1,
                Err(e) => self.renderer.error(format!("{e:#}"))?,
            }
        }
        Ok(executed)
    }

    /// Process one input line
    pub async fn exec(&mut self, line: &str) -> Result<ExecOutcome> {
        if let Some(pending) = self.session.take_pending() {
            self.send(pending.method, &pending.path, Some(line.to_string()))
                .await?;
            return Ok(ExecOutcome::Continue);
        }

        let command = ConsoleCommand::parse(line.trim());
        tracing::debug!("Parsed command: {:?}", command);
        self.dispatch(command).await
    }

    async fn dispatch(&mut self, command: ConsoleCommand) -> Result<ExecOutcome> {
        match command {
            ConsoleCommand::Empty => {}
            ConsoleCommand::PathSet(path) => self.session.path.push_path(&path),
            ConsoleCommand::PathReset => self.session.path.reset(),
            ConsoleCommand::PathPop => {
                self.session.path.pop();
            }
            ConsoleCommand::Meta(meta) => return self.meta(meta),
            ConsoleCommand::HeaderSet { name, value } => self.session.headers.set(name, value),
            ConsoleCommand::HeaderRemove { name } => {
                self.session.headers.remove(&name);
            }
            ConsoleCommand::Request { verb, argument } => {
                let path = self.session.path.request_path(argument.as_deref());
                if verb.takes_body() {
                    self.session.await_body(verb, path);
                } else {
                    self.send(verb, &path, None).await?;
                }
            }
            ConsoleCommand::Unknown(line) => {
                tracing::debug!("Unknown command: {}", line);
                self.renderer.warning(format!("unknown command '{line}'"))?;
            }
        }
        Ok(ExecOutcome::Continue)
    }

    fn meta(&mut self, meta: MetaCommand) -> Result<ExecOutcome> {
        match meta {
            MetaCommand::Headers => {
                let path = self.session.path.render();
                let cookie = self.session.cookies.cookie_header(&path);
                let merged = self
                    .session
                    .headers
                    .compose(Vec::new(), &self.session.host, cookie);
                self.renderer
                    .headers(merged.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
            }
            MetaCommand::DefaultHeaders => {
                self.renderer.headers(self.session.headers.iter())?;
            }
            MetaCommand::Options => {
                let options = serde_json::to_value(&self.session.options)?;
                self.renderer.structured(&options)?;
            }
            MetaCommand::Cookies => {
                self.renderer.structured(&self.session.cookies.to_json())?;
            }
            MetaCommand::Help => self.renderer.help()?,
            MetaCommand::Json => self.session.headers.set(CONTENT_TYPE, APPLICATION_JSON),
            MetaCommand::Quit => return Ok(ExecOutcome::Quit),
            MetaCommand::Unrecognized(name) => {
                tracing::debug!("Ignoring meta command '.{}'", name);
            }
        }
        Ok(ExecOutcome::Continue)
    }

    /// Send one request and render the outcome. Transport failures are
    /// reported and swallowed; the session carries on.
    async fn send(&mut self, verb: HttpVerb, path: &str, body: Option<String>) -> Result<()> {
        let request = OutgoingRequest::prepare(&self.session, verb, path, body);

        if self.session.options.verbose {
            self.renderer.request_echo(&request)?;
        }

        match self.http.execute(&self.session.origin(), &request).await {
            Ok(response) => {
                if self.session.options.remember_cookies {
                    let stored = self.session.cookies.remember(response.set_cookies());
                    tracing::debug!("Stored {} cookie(s)", stored);
                }
                self.renderer.response(&response)?;
                self.last_response = Some(response);
            }
            Err(e) => {
                tracing::warn!("Request {} {} failed: {}", verb, request.path, e);
                self.renderer.error(&e)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::io::{MockLineSource, SharedOutput};
    use crate::repl::models::InterpreterState;

    fn console() -> (Console<MockLineSource, SharedOutput>, SharedOutput) {
        colored::control::set_override(false);
        let output = SharedOutput::new();
        let console = Console::new(
            "localhost",
            8080,
            ConsoleOptions::default(),
            MockLineSource::default(),
            output.clone(),
        )
        .unwrap();
        (console, output)
    }

    #[tokio::test]
    async fn path_commands_should_navigate() {
        let (mut console, _) = console();
        for line in ["/a", "/b/c", "..", "//", "/x"] {
            console.exec(line).await.unwrap();
        }
        assert_eq!(console.session().path.segments(), ["x"]);
        assert_eq!(console.prompt(), "http://localhost:8080/x> ");
    }

    #[tokio::test]
    async fn header_directives_should_set_and_remove() {
        let (mut console, _) = console();
        console.exec("Foo: bar").await.unwrap();
        assert_eq!(console.session().headers.get("Foo"), Some("bar"));

        console.exec("Foo:").await.unwrap();
        assert_eq!(console.session().headers.get("Foo"), None);
    }

    #[tokio::test]
    async fn body_verb_should_wait_for_body() {
        let (mut console, _) = console();
        console.exec("/api").await.unwrap();
        console.exec("post items").await.unwrap();

        assert_eq!(console.session().state(), InterpreterState::AwaitingBody);
        let pending = console.session().pending().unwrap();
        assert_eq!(pending.method, HttpVerb::Post);
        assert_eq!(pending.path, "/api/items");
        assert_eq!(console.prompt(), BODY_PROMPT);
    }

    #[tokio::test]
    async fn json_meta_should_force_content_type() {
        let (mut console, _) = console();
        console.exec(".j").await.unwrap();
        assert_eq!(
            console.session().headers.get(CONTENT_TYPE),
            Some(APPLICATION_JSON)
        );
    }

    #[tokio::test]
    async fn quit_should_stop_the_loop() {
        let (mut console, _) = console();
        assert_eq!(console.exec(".quit").await.unwrap(), ExecOutcome::Quit);
        assert_eq!(console.exec("\\q").await.unwrap(), ExecOutcome::Quit);
    }

    #[tokio::test]
    async fn unknown_command_should_warn_without_state_change() {
        let (mut console, output) = console();
        let before = console.session().headers.clone();

        console.exec("hello there").await.unwrap();

        assert!(output.contents().contains("unknown command 'hello there'"));
        assert_eq!(console.session().headers, before);
        assert!(console.session().path.is_root());
    }

    #[tokio::test]
    async fn unrecognized_meta_should_be_silent() {
        let (mut console, output) = console();
        console.exec(".nonsense").await.unwrap();
        assert_eq!(output.contents(), "");
    }

    #[tokio::test]
    async fn headers_meta_should_show_host_and_cookies() {
        let (mut console, output) = console();
        console.session_mut().cookies.remember(["sid=42"]);

        console.exec(".headers").await.unwrap();
        let text = output.contents();
        assert!(text.contains("Accept: */*"));
        assert!(text.contains("Host: localhost"));
        assert!(text.contains("Cookie: sid=42"));
        assert!(console.session().headers.get("Cookie").is_none());
    }

    #[tokio::test]
    async fn default_headers_meta_should_show_stored_headers_only() {
        let (mut console, output) = console();
        console.exec("X-Trace: on").await.unwrap();
        console.exec(".default-headers").await.unwrap();

        let text = output.contents();
        assert!(text.contains("Accept: */*"));
        assert!(text.contains("X-Trace: on"));
        assert!(!text.contains("Host:"));
    }

    #[tokio::test]
    async fn run_should_stop_at_end_of_input() {
        colored::control::set_override(false);
        let output = SharedOutput::new();
        let source = MockLineSource::new(["/users", "Accept: text/plain"]);
        let mut console =
            Console::new("localhost", 8080, ConsoleOptions::default(), source, output).unwrap();

        console.run().await.unwrap();

        assert_eq!(console.session().path.segments(), ["users"]);
        assert_eq!(console.session().headers.get("Accept"), Some("text/plain"));
        assert_eq!(
            console.line_source().prompts(),
            [
                "http://localhost:8080/> ",
                "http://localhost:8080/users> ",
                "http://localhost:8080/users> "
            ]
        );
    }
}
