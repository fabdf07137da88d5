//! Read-only access to request headers.
//!
//! The binder never owns or mutates a request. It reads headers through the
//! [`HeaderSource`] trait, which is implemented for `http` crate types and for
//! [`RequestHeaders`], a framework-agnostic store for callers that do not use
//! `http`.

use http::{HeaderMap, Request};

/// Case-insensitive, multi-value header lookup.
///
/// Implementations return every physical header line for a name, in the order
/// received. Joining and splitting is shared through the provided methods so
/// all stores degrade multiple lines the same way.
pub trait HeaderSource: Send + Sync {
    /// Returns `true` if at least one line for `name` is present.
    fn contains(&self, name: &str) -> bool;

    /// Returns all raw values for `name`, one per header line.
    fn get_all(&self, name: &str) -> Vec<String>;

    /// Returns all values for `name` joined with `,`, or `None` if absent.
    fn get_joined(&self, name: &str) -> Option<String> {
        let values = self.get_all(name);
        if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        }
    }

    /// Returns the quote-aware comma-split tokens of all values for `name`.
    fn get_comma_separated(&self, name: &str) -> Vec<String> {
        self.get_joined(name)
            .map(|joined| split_comma_separated(&joined))
            .unwrap_or_default()
    }
}

impl HeaderSource for HeaderMap {
    fn contains(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn get_all(&self, name: &str) -> Vec<String> {
        HeaderMap::get_all(self, name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect()
    }
}

impl<B: Send + Sync> HeaderSource for Request<B> {
    fn contains(&self, name: &str) -> bool {
        self.headers().contains(name)
    }

    fn get_all(&self, name: &str) -> Vec<String> {
        HeaderSource::get_all(self.headers(), name)
    }
}

/// Owned header store for requests that do not come from the `http` crate.
///
/// Names compare case-insensitively. Adding the same name twice keeps both
/// lines, like a repeated header on the wire.
///
/// # Examples
///
/// ```
/// use header_binding::{HeaderSource, RequestHeaders};
///
/// let headers = RequestHeaders::new()
///     .with_header("Accept", "application/json")
///     .with_header("accept", "text/json");
///
/// assert!(headers.contains("ACCEPT"));
/// assert_eq!(headers.get_joined("Accept").unwrap(), "application/json,text/json");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    lines: Vec<(String, String)>,
}

impl RequestHeaders {
    /// Creates an empty header store.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Appends a header line.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.lines.push((name.into(), value.into()));
    }

    /// Appends a header line, builder style.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    /// Returns the number of header lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no header lines are stored.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl HeaderSource for RequestHeaders {
    fn contains(&self, name: &str) -> bool {
        self.lines.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    fn get_all(&self, name: &str) -> Vec<String> {
        self.lines
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
            .collect()
    }
}

/// Splits a header value on commas that are not inside a double-quoted segment.
///
/// Quotes are removed from the resulting tokens, a backslash inside quotes
/// escapes the next character, unquoted whitespace around a token is trimmed,
/// and empty tokens are dropped.
///
/// # Examples
///
/// ```
/// use header_binding::split_comma_separated;
///
/// assert_eq!(split_comma_separated(r#"foo, "bar""#), vec!["foo", "bar"]);
/// assert_eq!(split_comma_separated(r#""foo,bar""#), vec!["foo,bar"]);
/// assert!(split_comma_separated(" , ").is_empty());
/// ```
pub fn split_comma_separated(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Length of `current` that trimming must not cut into.
    let mut kept = 0;
    let mut in_quotes = false;
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                kept = current.len();
            }
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                kept = current.len();
            }
            ',' if !in_quotes => {
                finish_token(&mut tokens, &mut current, kept);
                kept = 0;
            }
            c if in_quotes => {
                current.push(c);
                kept = current.len();
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    current.push(c);
                }
            }
            c => {
                current.push(c);
                kept = current.len();
            }
        }
    }
    finish_token(&mut tokens, &mut current, kept);

    tokens
}

fn finish_token(tokens: &mut Vec<String>, current: &mut String, kept: usize) {
    current.truncate(kept);
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
    current.clear();
}
