//! Common test utilities and infrastructure
//!
//! Builds a real `Console` pointed at a wiremock server, with scripted input
//! and captured output.

use http_console::config::ConsoleOptions;
use http_console::repl::io::{MockLineSource, SharedOutput};
use http_console::Console;
use wiremock::MockServer;

pub type TestConsole = Console<MockLineSource, SharedOutput>;

/// Console talking to `server` with the given options and input lines
#[allow(dead_code)]
pub fn console_for<I, S>(server: &MockServer, options: ConsoleOptions, lines: I) -> (TestConsole, SharedOutput)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    colored::control::set_override(false);
    let output = SharedOutput::new();
    let address = server.address();
    let console = Console::new(
        address.ip().to_string(),
        address.port(),
        options,
        MockLineSource::new(lines),
        output.clone(),
    )
    .expect("console should build");
    (console, output)
}

/// Options with cookie capture turned on
#[allow(dead_code)]
pub fn remembering_cookies() -> ConsoleOptions {
    ConsoleOptions {
        remember_cookies: true,
        ..Default::default()
    }
}

/// Header value of a received request, as text
#[allow(dead_code)]
pub fn header_value(request: &wiremock::Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
