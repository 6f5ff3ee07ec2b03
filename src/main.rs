//! # http-console Main Entry Point

use anyhow::Result;
use http_console::cmd_args::CommandLineArgs;
use http_console::config::LOG_ENV_VAR;
use http_console::repl::io::TerminalLineSource;
use http_console::Console;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = CommandLineArgs::parse();
    let host = args.host().clone();
    let port = args.port();
    tracing::info!("Starting console for {}:{}", host, port);

    let line_source = TerminalLineSource::new()?;
    let mut console = Console::new(host, port, args.into_options(), line_source, std::io::stdout())?;
    console.run().await?;

    Ok(())
}
