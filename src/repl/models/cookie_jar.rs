//! Cookie jar model
//!
//! Cookies captured from `Set-Cookie` responses. Nothing is ever evicted:
//! expiry and path scoping are applied only when the outgoing `Cookie`
//! header is rendered.

use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Serialize, Serializer};

use crate::error::{ConsoleError, Result};

/// Characters left alone when escaping a cookie value (URI component rules)
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Netscape-style expiry dates that RFC 2822 parsing rejects
const LEGACY_EXPIRES_FORMATS: [&str; 2] = ["%a, %d-%b-%Y %H:%M:%S GMT", "%a, %d-%b-%y %H:%M:%S GMT"];

/// Value of a cookie attribute: `attr=val` or a bare `attr`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CookieAttribute {
    Value(String),
    Flag(bool),
}

impl CookieAttribute {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CookieAttribute::Value(value) => Some(value),
            CookieAttribute::Flag(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cookie {
    pub value: String,
    #[serde(serialize_with = "attributes_as_map")]
    pub attributes: Vec<(String, CookieAttribute)>,
    #[serde(skip)]
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            attributes: Vec::new(),
            expires: None,
        }
    }

    /// Attribute lookup, case-insensitive on the name
    pub fn attribute(&self, name: &str) -> Option<&CookieAttribute> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn path(&self) -> Option<&str> {
        self.attribute("path").and_then(CookieAttribute::as_str)
    }

    /// Whether the cookie may be sent with a request for `request_path` at `now`
    pub fn is_eligible(&self, request_path: &str, now: DateTime<Utc>) -> bool {
        if let Some(expires) = self.expires {
            if now > expires {
                return false;
            }
        }
        match self.path() {
            Some(prefix) => request_path.starts_with(prefix),
            None => true,
        }
    }
}

fn attributes_as_map<S: Serializer>(
    attributes: &[(String, CookieAttribute)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(attributes.iter().map(|(k, v)| (k, v)))
}

/// Parse one `Set-Cookie` value into its name and cookie
pub fn parse_set_cookie(header: &str) -> Result<(String, Cookie)> {
    let mut parts = header.split(';').map(str::trim_start);
    let first = parts.next().unwrap_or_default().trim();

    let (name, raw_value) = first
        .split_once('=')
        .ok_or_else(|| ConsoleError::MalformedCookie(header.to_string()))?;
    if name.is_empty() {
        return Err(ConsoleError::MalformedCookie(header.to_string()));
    }

    let mut cookie = Cookie::new(percent_decode_str(raw_value).decode_utf8_lossy());

    for part in parts.filter(|part| !part.is_empty()) {
        let attribute = match part.split_once('=') {
            Some((attr, val)) => (attr.to_string(), CookieAttribute::Value(val.to_string())),
            None => (part.to_string(), CookieAttribute::Flag(true)),
        };
        cookie.attributes.push(attribute);
    }

    if let Some(CookieAttribute::Value(expires)) = cookie.attribute("expires") {
        let parsed = parse_expires(expires)
            .ok_or_else(|| ConsoleError::MalformedCookie(header.to_string()))?;
        cookie.expires = Some(parsed);
    }

    Ok((name.to_string(), cookie))
}

/// Parse an `Expires` attribute (RFC 1123/2822 or the Netscape dashed form)
pub fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    LEGACY_EXPIRES_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Cookies by name, in the order they first arrived
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieJar {
    cookies: Vec<(String, Cookie)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite a cookie. Overwrites keep the original position.
    pub fn insert(&mut self, name: impl Into<String>, cookie: Cookie) {
        let name = name.into();
        match self.cookies.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = cookie,
            None => self.cookies.push((name, cookie)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|(k, _)| k == name).map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cookie)> {
        self.cookies.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Absorb every `Set-Cookie` value of a response. Malformed ones are
    /// skipped; returns how many cookies were stored.
    pub fn remember<'a>(&mut self, set_cookies: impl IntoIterator<Item = &'a str>) -> usize {
        let mut stored = 0;
        for header in set_cookies {
            match parse_set_cookie(header) {
                Ok((name, cookie)) => {
                    tracing::debug!("Remembering cookie '{}'", name);
                    self.insert(name, cookie);
                    stored += 1;
                }
                Err(e) => tracing::warn!("Skipping cookie: {}", e),
            }
        }
        stored
    }

    /// `Cookie` header value for a request to `request_path` right now
    pub fn cookie_header(&self, request_path: &str) -> Option<String> {
        self.cookie_header_at(request_path, Utc::now())
    }

    /// `Cookie` header value for a request to `request_path` at `now`.
    /// Pairs are joined with `", "`; `None` when nothing is eligible.
    pub fn cookie_header_at(&self, request_path: &str, now: DateTime<Utc>) -> Option<String> {
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|(_, cookie)| cookie.is_eligible(request_path, now))
            .map(|(name, cookie)| {
                format!("{}={}", name, utf8_percent_encode(&cookie.value, COOKIE_VALUE))
            })
            .collect();

        (!pairs.is_empty()).then(|| pairs.join(", "))
    }

    /// The jar as structured data for display
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .cookies
            .iter()
            .map(|(name, cookie)| {
                let value = serde_json::to_value(cookie).unwrap_or(serde_json::Value::Null);
                (name.clone(), value)
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}
