//! # HTTP Service
//!
//! Builds and sends one request at a time against the session host and
//! buffers the whole response before handing it back.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Url};
use std::time::Instant;

use crate::config::{ConsoleOptions, REQUEST_TIMEOUT_MS};
use crate::error::{ConsoleError, Result};
use crate::repl::command::HttpVerb;
use crate::repl::models::header_store::{HeaderList, CONTENT_LENGTH};
use crate::repl::models::{ResponseModel, ResponseStatus, Session};

use super::body::decode_body;

/// Characters `encodeURI` leaves untouched besides alphanumerics. `#` is
/// escaped too, since a request target has no fragment.
const URI: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Base the request target is resolved against to learn its wire form
const WIRE_BASE: &str = "http://localhost/";

impl From<HttpVerb> for Method {
    fn from(verb: HttpVerb) -> Self {
        match verb {
            HttpVerb::Get => Method::GET,
            HttpVerb::Post => Method::POST,
            HttpVerb::Put => Method::PUT,
            HttpVerb::Patch => Method::PATCH,
            HttpVerb::Head => Method::HEAD,
            HttpVerb::Delete => Method::DELETE,
        }
    }
}

/// A fully resolved request, ready to send or echo
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub verb: HttpVerb,
    /// Encoded path and query, exactly as sent
    pub path: String,
    pub headers: HeaderList,
    pub body: Option<String>,
}

impl OutgoingRequest {
    /// Resolve headers and path for `verb path` against the session.
    ///
    /// Body requests carry a `Content-Length` equal to the body's byte
    /// length unless the session overrides it.
    pub fn prepare(session: &Session, verb: HttpVerb, path: &str, body: Option<String>) -> Self {
        let per_call = match &body {
            Some(body) => vec![(CONTENT_LENGTH.to_string(), body.len().to_string())],
            None => Vec::new(),
        };

        let cookie = session.cookies.cookie_header(path);
        let headers = session.headers.compose(per_call, &session.host, cookie);

        Self {
            verb,
            path: wire_target(path),
            headers,
            body,
        }
    }
}

/// Percent-encode a request target the way `encodeURI` does
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, URI).to_string()
}

/// Encode `path` and resolve it the way the URL parser will, so the target
/// echoed and logged is the one that goes on the wire.
pub fn wire_target(path: &str) -> String {
    let encoded = encode_path(path);
    let resolved = Url::parse(WIRE_BASE).and_then(|base| base.join(&encoded));
    match resolved {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        Err(e) => {
            tracing::debug!("Could not resolve '{}': {}", encoded, e);
            encoded
        }
    }
}

/// Service for sending requests to the session host
#[derive(Debug, Clone)]
pub struct HttpService {
    client: Client,
    timeout_ms: Option<u64>,
}

impl HttpService {
    /// Create a new HttpService honouring the timeout option
    pub fn new(options: &ConsoleOptions) -> Result<Self> {
        // Redirects are never followed; a 3xx is a response like any other
        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = options.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;
        tracing::debug!("HttpClient created, timeout={:?}", options.request_timeout());

        Ok(Self {
            client,
            timeout_ms: options.timeout.then_some(REQUEST_TIMEOUT_MS),
        })
    }

    /// Send `request` to `origin` and buffer the response
    pub async fn execute(&self, origin: &str, request: &OutgoingRequest) -> Result<ResponseModel> {
        let target = format!("{}{}", origin, request.path);
        let url = Url::parse(&target).map_err(|e| ConsoleError::InvalidUrl(format!("{target}: {e}")))?;

        let mut builder = self.client.request(Method::from(request.verb), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        tracing::debug!("Sending {} {}", request.verb, target);
        let start_time = Instant::now();

        let response = builder
            .send()
            .await
            .map_err(|e| ConsoleError::from_transport(e, self.timeout_ms))?;

        let version = format!("{:?}", response.version());
        let status = response.status();
        let headers: HeaderList = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let raw = response
            .bytes()
            .await
            .map_err(|e| ConsoleError::from_transport(e, self.timeout_ms))?;

        let mut model = ResponseModel::new(
            version,
            ResponseStatus::new(status.as_u16(), status.canonical_reason().unwrap_or("")),
        );
        model.headers = headers;
        model.body = decode_body(
            raw,
            model.header("content-encoding"),
            model.header("content-type"),
        );
        model.duration_ms = start_time.elapsed().as_millis() as u64;

        tracing::info!(
            "{} {} -> {} in {}ms",
            request.verb,
            request.path,
            model.status.code,
            model.duration_ms
        );

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::models::header_store::{ACCEPT, COOKIE, HOST};

    fn session() -> Session {
        Session::new("api.local", 8080, ConsoleOptions::default())
    }

    #[test]
    fn encode_path_should_keep_reserved_characters() {
        assert_eq!(encode_path("/a/b?x=1&y=2"), "/a/b?x=1&y=2");
        assert_eq!(encode_path("/a b/ü"), "/a%20b/%C3%BC");
        assert_eq!(encode_path("/x#frag"), "/x%23frag");
    }

    #[test]
    fn wire_target_should_resolve_dot_segments() {
        assert_eq!(wire_target("/a/../b"), "/b");
        assert_eq!(wire_target("/a/./b?q=1"), "/a/b?q=1");
    }

    #[test]
    fn wire_target_should_keep_hash_in_path() {
        assert_eq!(wire_target("/x#frag"), "/x%23frag");
        assert_eq!(wire_target("/s?tag=#1"), "/s?tag=%231");
    }

    #[test]
    fn prepare_should_carry_wire_target() {
        let request = OutgoingRequest::prepare(&session(), HttpVerb::Get, "/a/../b c", None);
        assert_eq!(request.path, "/b%20c");
    }

    #[test]
    fn prepare_should_add_content_length_for_body() {
        let request = OutgoingRequest::prepare(
            &session(),
            HttpVerb::Post,
            "/items",
            Some("hello".to_string()),
        );
        assert!(request
            .headers
            .contains(&(CONTENT_LENGTH.to_string(), "5".to_string())));
        assert_eq!(request.body.as_deref(), Some("hello"));
    }

    #[test]
    fn content_length_should_count_bytes() {
        let request =
            OutgoingRequest::prepare(&session(), HttpVerb::Put, "/", Some("héllo".to_string()));
        assert!(request
            .headers
            .contains(&(CONTENT_LENGTH.to_string(), "6".to_string())));
    }

    #[test]
    fn prepare_should_not_add_content_length_without_body() {
        let request = OutgoingRequest::prepare(&session(), HttpVerb::Get, "/", None);
        assert!(!request
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(CONTENT_LENGTH)));
    }

    #[test]
    fn prepare_should_include_accept_host_and_cookie() {
        let mut session = session();
        session.cookies.remember(["sid=1"]);

        let request = OutgoingRequest::prepare(&session, HttpVerb::Get, "/x", None);
        assert!(request
            .headers
            .contains(&(ACCEPT.to_string(), "*/*".to_string())));
        assert!(request
            .headers
            .contains(&(HOST.to_string(), "api.local".to_string())));
        assert!(request
            .headers
            .contains(&(COOKIE.to_string(), "sid=1".to_string())));
    }

    #[test]
    fn verb_should_map_to_method() {
        assert_eq!(Method::from(HttpVerb::Patch), Method::PATCH);
        assert_eq!(Method::from(HttpVerb::Head), Method::HEAD);
    }

    #[test]
    fn service_should_build_with_timeout() {
        let options = ConsoleOptions {
            timeout: true,
            ..Default::default()
        };
        let service = HttpService::new(&options).unwrap();
        assert_eq!(service.timeout_ms, Some(5000));
    }
}
