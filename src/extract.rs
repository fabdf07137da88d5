//! Shape-sensitive extraction of raw header tokens.

use crate::headers::HeaderSource;
use crate::shape::TypeShape;

/// How the tokens of a [`RawTokens`] were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// One token holding the whole (comma-joined) header value.
    Joined,
    /// Quote-aware comma-split tokens.
    Split,
}

/// The strings extracted from one header for one field.
///
/// `present` distinguishes a missing header from a header that is present but
/// yields no tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTokens {
    tokens: Vec<String>,
    mode: SplitMode,
    present: bool,
}

impl RawTokens {
    /// Tokens for a header that is not in the request.
    pub fn absent() -> Self {
        Self {
            tokens: Vec::new(),
            mode: SplitMode::Joined,
            present: false,
        }
    }

    /// Returns the extracted tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Consumes `self`, returning the tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    /// Returns the splitting mode used.
    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Returns `true` if the header was present in the request.
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Returns `true` if no tokens were extracted.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Human-readable form of the tokens: joined with `,`.
    pub fn attempted_value(&self) -> String {
        self.tokens.join(",")
    }
}

/// Extracts the tokens for `field_name` according to `shape`.
///
/// Scalar shapes receive the literal header text as a single token, commas and
/// all. Collection shapes receive the quote-aware comma-split tokens of every
/// header line.
///
/// # Examples
///
/// ```
/// use header_binding::{extract, RequestHeaders, SplitMode, TypeShape};
///
/// let headers = RequestHeaders::new().with_header("Accept", "application/json,text/json");
///
/// let scalar = extract(&headers, "Accept", &TypeShape::text());
/// assert_eq!(scalar.tokens(), ["application/json,text/json"]);
///
/// let split = extract(&headers, "Accept", &TypeShape::strings());
/// assert_eq!(split.mode(), SplitMode::Split);
/// assert_eq!(split.tokens(), ["application/json", "text/json"]);
/// ```
pub fn extract<H>(headers: &H, field_name: &str, shape: &TypeShape) -> RawTokens
where
    H: HeaderSource + ?Sized,
{
    let Some(joined) = headers.get_joined(field_name) else {
        return RawTokens::absent();
    };

    if shape.is_collection() {
        RawTokens {
            tokens: crate::headers::split_comma_separated(&joined),
            mode: SplitMode::Split,
            present: true,
        }
    } else {
        RawTokens {
            tokens: vec![joined],
            mode: SplitMode::Joined,
            present: true,
        }
    }
}
