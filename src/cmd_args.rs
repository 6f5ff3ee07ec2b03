use std::ffi::OsString;

pub use clap::Parser;

use crate::config::{self, ConsoleOptions, Credentials};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    #[clap(
        default_value = config::DEFAULT_HOST,
        help = "host[:port] or http(s)://host[:port] to connect to"
    )]
    target: String,

    /// Explicit port, overrides any port given with the host
    #[clap(long, help = "port to connect to")]
    port: Option<u16>,

    #[clap(
        short = 'v',
        long,
        help = "Echo outgoing requests",
        default_value = "false"
    )]
    verbose: bool,

    #[clap(
        short = 'j',
        long,
        help = "Set Accept and Content-Type to application/json",
        default_value = "false"
    )]
    json: bool,

    #[clap(long, value_name = "USER:PASS", help = "Basic auth credentials")]
    auth: Option<String>,

    #[clap(short = 's', long, help = "Use HTTPS", default_value = "false")]
    ssl: bool,

    #[clap(long, help = "Remember cookies", default_value = "false")]
    cookies: bool,

    #[clap(
        long,
        help = "Abort requests after 5 seconds",
        default_value = "false"
    )]
    timeout: bool,

    #[clap(long, value_name = "FILE", help = "Replay commands from FILE at startup")]
    rc: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    host: String,
    port: u16,
    options: ConsoleOptions,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Self {
        let (host, port, scheme) = split_target(&args.target);
        let use_ssl = args.ssl || scheme == Some(Scheme::Https);

        let default_port = match scheme {
            _ if use_ssl => config::DEFAULT_SSL_PORT,
            Some(Scheme::Http) => config::DEFAULT_HTTP_PORT,
            _ => config::DEFAULT_PORT,
        };
        let port = args.port.or(port).unwrap_or(default_port);

        let options = ConsoleOptions {
            verbose: args.verbose,
            json: args.json,
            auth: args.auth.as_deref().map(Credentials::parse),
            use_ssl,
            remember_cookies: args.cookies,
            timeout: args.timeout,
            config_file: config::get_rc_path(args.rc.as_deref()),
        };

        Self {
            host,
            port,
            options,
        }
    }

    pub fn host(&self) -> &String {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn options(&self) -> &ConsoleOptions {
        &self.options
    }

    pub fn into_options(self) -> ConsoleOptions {
        self.options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Http,
    Https,
}

/// Split `[scheme://]host[:port][/...]` into host, optional port and the
/// scheme, if one was written.
fn split_target(target: &str) -> (String, Option<u16>, Option<Scheme>) {
    let (rest, scheme) = if let Some(rest) = target.strip_prefix("https://") {
        (rest, Some(Scheme::Https))
    } else if let Some(rest) = target.strip_prefix("http://") {
        (rest, Some(Scheme::Http))
    } else {
        (target, None)
    };

    let authority = rest.split('/').next().unwrap_or(rest);

    match authority.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host.to_string(), Some(port), scheme),
            Err(_) => (authority.to_string(), None, scheme),
        },
        None => (authority.to_string(), None, scheme),
    }
}
