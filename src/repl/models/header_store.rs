//! Header store model
//!
//! Session-level request headers. Names keep the case they were typed in and
//! insertion order is preserved for display.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::{ConsoleOptions, Credentials};

pub const ACCEPT: &str = "Accept";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const HOST: &str = "Host";
pub const COOKIE: &str = "Cookie";
pub const CONTENT_LENGTH: &str = "Content-Length";

pub const DEFAULT_ACCEPT: &str = "*/*";
pub const APPLICATION_JSON: &str = "application/json";

/// Ordered header list, last write wins
pub type HeaderList = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderStore {
    headers: HeaderList,
}

impl Default for HeaderStore {
    fn default() -> Self {
        Self {
            headers: vec![(ACCEPT.to_string(), DEFAULT_ACCEPT.to_string())],
        }
    }
}

impl HeaderStore {
    /// Store holding only the default `Accept`
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial headers for a session built from `options`
    pub fn from_options(options: &ConsoleOptions) -> Self {
        let mut store = Self::new();

        if options.json {
            store.set(ACCEPT, APPLICATION_JSON);
            store.set(CONTENT_TYPE, APPLICATION_JSON);
        }

        if let Some(credentials) = &options.auth {
            store.set(AUTHORIZATION, basic_auth(credentials));
        }

        store
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Remove a header. `Accept` is never removed; it falls back to `*/*`.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        if name == ACCEPT {
            let previous = self.get(ACCEPT).map(str::to_string);
            self.set(ACCEPT, DEFAULT_ACCEPT);
            return previous;
        }

        let index = self.headers.iter().position(|(k, _)| k == name)?;
        Some(self.headers.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Headers for one outgoing request.
    ///
    /// Session headers override `per_call`; then `Host` and `Cookie` are
    /// added unless a non-empty one is already there.
    pub fn compose(&self, per_call: HeaderList, host: &str, cookie: Option<String>) -> HeaderList {
        let mut merged = per_call;
        for (name, value) in self.iter() {
            upsert(&mut merged, name, value);
        }

        add_if_missing(&mut merged, HOST, host.to_string());
        if let Some(cookie) = cookie {
            add_if_missing(&mut merged, COOKIE, cookie);
        }

        merged
    }
}

/// `Basic base64(user:pass)`
pub fn basic_auth(credentials: &Credentials) -> String {
    let token = format!("{}:{}", credentials.username, credentials.password);
    format!("Basic {}", STANDARD.encode(token))
}

fn upsert(headers: &mut HeaderList, name: &str, value: &str) {
    match headers
        .iter_mut()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
    {
        Some(entry) => *entry = (name.to_string(), value.to_string()),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

fn add_if_missing(headers: &mut HeaderList, name: &str, value: String) {
    if value.is_empty() {
        return;
    }
    match headers
        .iter_mut()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
    {
        Some(entry) if entry.1.is_empty() => entry.1 = value,
        Some(_) => {}
        None => headers.push((name.to_string(), value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_should_contain_accept() {
        let store = HeaderStore::new();
        assert_eq!(store.get(ACCEPT), Some("*/*"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_then_remove_should_round_trip() {
        let mut store = HeaderStore::new();
        store.set("Foo", "bar");
        assert_eq!(store.get("Foo"), Some("bar"));

        assert_eq!(store.remove("Foo"), Some("bar".to_string()));
        assert_eq!(store.get("Foo"), None);
        assert_eq!(store.remove("Foo"), None);
    }

    #[test]
    fn set_should_overwrite_in_place() {
        let mut store = HeaderStore::new();
        store.set("X-One", "1");
        store.set("X-Two", "2");
        store.set("X-One", "uno");

        let names: Vec<_> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(names, [ACCEPT, "X-One", "X-Two"]);
        assert_eq!(store.get("X-One"), Some("uno"));
    }

    #[test]
    fn removing_accept_should_restore_default() {
        let mut store = HeaderStore::new();
        store.set(ACCEPT, "text/html");
        store.remove(ACCEPT);
        assert_eq!(store.get(ACCEPT), Some(DEFAULT_ACCEPT));
    }

    #[test]
    fn json_option_should_set_accept_and_content_type() {
        let options = ConsoleOptions {
            json: true,
            ..Default::default()
        };
        let store = HeaderStore::from_options(&options);
        assert_eq!(store.get(ACCEPT), Some(APPLICATION_JSON));
        assert_eq!(store.get(CONTENT_TYPE), Some(APPLICATION_JSON));
    }

    #[test]
    fn auth_option_should_compute_basic_header() {
        let options = ConsoleOptions {
            auth: Some(Credentials::new("Aladdin", "open sesame")),
            ..Default::default()
        };
        let store = HeaderStore::from_options(&options);
        assert_eq!(
            store.get(AUTHORIZATION),
            Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
        );
    }

    #[test]
    fn compose_should_let_session_headers_win() {
        let mut store = HeaderStore::new();
        store.set("content-length", "99");

        let merged = store.compose(
            vec![(CONTENT_LENGTH.to_string(), "5".to_string())],
            "example.com",
            None,
        );

        let lengths: Vec<_> = merged
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(CONTENT_LENGTH))
            .collect();
        assert_eq!(lengths.len(), 1);
        assert_eq!(lengths[0].1, "99");
    }

    #[test]
    fn compose_should_default_host_and_cookie() {
        let store = HeaderStore::new();
        let merged = store.compose(Vec::new(), "example.com", Some("id=1".to_string()));
        assert!(merged.contains(&(HOST.to_string(), "example.com".to_string())));
        assert!(merged.contains(&(COOKIE.to_string(), "id=1".to_string())));
    }

    #[test]
    fn compose_should_keep_explicit_host_and_cookie() {
        let mut store = HeaderStore::new();
        store.set("host", "virtual.example");
        store.set("Cookie", "manual=1");

        let merged = store.compose(Vec::new(), "example.com", Some("jar=2".to_string()));
        assert!(merged.contains(&("host".to_string(), "virtual.example".to_string())));
        assert!(merged.contains(&(COOKIE.to_string(), "manual=1".to_string())));
        assert!(!merged.iter().any(|(_, v)| v == "example.com" || v == "jar=2"));
    }
}
