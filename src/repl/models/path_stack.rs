//! Path stack model
//!
//! The current resource location as an ordered list of path segments.
//! An empty stack is the root `/`.

/// Ordered stack of non-empty path segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStack {
    segments: Vec<String>,
}

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every non-empty `/`-separated piece of `path`
    pub fn push_path(&mut self, path: &str) {
        self.segments.extend(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        );
    }

    /// Drop the last segment. No-op at the root.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Back to `/`
    pub fn reset(&mut self) {
        self.segments.clear();
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render as `/a/b`, or `/` for the root
    pub fn render(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Build a request target from the stack plus an optional verb argument.
    ///
    /// The argument is split on its first `?`. The part before it becomes one
    /// more segment; runs of `/` in the joined path collapse to one. A
    /// non-empty part after it is kept verbatim as the query string.
    pub fn request_path(&self, argument: Option<&str>) -> String {
        let mut joined = self.segments.clone();
        let mut query = None;

        if let Some(argument) = argument {
            let (path, rest) = match argument.split_once('?') {
                Some((path, rest)) => (path, Some(rest)),
                None => (argument, None),
            };
            if !path.is_empty() {
                joined.push(path.to_string());
            }
            query = rest.filter(|q| !q.is_empty());
        }

        let mut target = collapse_slashes(&format!("/{}", joined.join("/")));
        if let Some(query) = query {
            target.push('?');
            target.push_str(query);
        }
        target
    }
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for ch in path.chars() {
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    out
}
