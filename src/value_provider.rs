//! Named value sources consulted by delegate binders.
//!
//! A delegate binder asks its context's [`ValueProvider`] for raw strings and
//! never learns whether they came from headers, a query string or anywhere
//! else.

use crate::extract::{RawTokens, SplitMode};

/// Raw strings returned by a [`ValueProvider`] lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderValue {
    values: Vec<String>,
}

impl ProviderValue {
    /// A lookup that found nothing.
    pub fn none() -> Self {
        Self { values: Vec::new() }
    }

    /// A lookup that found `values`.
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Returns `true` if nothing was found.
    pub fn is_none(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns all found values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the first found value.
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns the found values joined with `,`.
    pub fn joined(&self) -> String {
        self.values.join(",")
    }
}

/// A source of raw values looked up by key.
pub trait ValueProvider: Send + Sync {
    /// Returns `true` if the provider has values for keys under `prefix`.
    fn contains_prefix(&self, prefix: &str) -> bool;

    /// Returns the values for `key`.
    fn get_value(&self, key: &str) -> ProviderValue;
}

/// A provider with no values.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyValueProvider;

impl ValueProvider for EmptyValueProvider {
    fn contains_prefix(&self, _prefix: &str) -> bool {
        false
    }

    fn get_value(&self, _key: &str) -> ProviderValue {
        ProviderValue::none()
    }
}

/// Exposes the tokens extracted from one header to a delegate binder.
///
/// Every lookup resolves to the header this provider was built for,
/// whatever key the delegate asks under: the header name selects the source,
/// never the model name or a prefix. The split mode is fixed at construction.
///
/// A present header that yielded no tokens still answers
/// [`contains_prefix`](ValueProvider::contains_prefix) with `true`, so a
/// delegate can bind a top-level collection to an empty instance.
///
/// # Examples
///
/// ```
/// use header_binding::{extract, HeaderValueProvider, RequestHeaders, TypeShape, ValueProvider};
///
/// let headers = RequestHeaders::new().with_header("X-Count", "10");
/// let raw = extract(&headers, "X-Count", &TypeShape::text());
/// let provider = HeaderValueProvider::new("X-Count", raw);
///
/// assert!(provider.contains_prefix("Order.Count"));
/// assert_eq!(provider.get_value("Order.Count").first_value(), Some("10"));
/// ```
#[derive(Debug, Clone)]
pub struct HeaderValueProvider {
    header_name: String,
    tokens: Vec<String>,
    mode: SplitMode,
    present: bool,
}

impl HeaderValueProvider {
    /// Wraps the tokens extracted for `header_name`.
    pub fn new(header_name: impl Into<String>, raw: RawTokens) -> Self {
        let mode = raw.mode();
        let present = raw.is_present();
        Self {
            header_name: header_name.into(),
            tokens: raw.into_tokens(),
            mode,
            present,
        }
    }

    /// Returns the header this provider resolves every key to.
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Returns the split mode the tokens were produced with.
    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Returns `true` if any tokens were extracted.
    pub fn has_value(&self) -> bool {
        !self.tokens.is_empty()
    }
}

impl ValueProvider for HeaderValueProvider {
    fn contains_prefix(&self, _prefix: &str) -> bool {
        self.present
    }

    fn get_value(&self, key: &str) -> ProviderValue {
        if !key.eq_ignore_ascii_case(&self.header_name) {
            tracing::trace!(
                header = %self.header_name,
                key = %key,
                "resolving value provider key to header name"
            );
        }
        ProviderValue::new(self.tokens.clone())
    }
}
