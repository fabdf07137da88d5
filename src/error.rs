use std::fmt;

/// Errors raised when a binder is handed arguments that break its contract.
///
/// These are caller bugs, not request problems: they are detected before any
/// header is read and are never turned into validation messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The field name used to look up the header is empty.
    EmptyFieldName,
    /// The field name cannot be used as an HTTP header name.
    InvalidHeaderName {
        /// The rejected field name
        name: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyFieldName => write!(f, "field name must not be empty"),
            Error::InvalidHeaderName { name } => {
                write!(f, "'{}' is not a valid header name", name)
            }
        }
    }
}

impl std::error::Error for Error {}

/// A failure reported by a delegate binder while converting raw header values.
///
/// The header binder never creates these itself; it passes them through
/// unchanged so the caller can attach the recorded provenance to a
/// validation message.
///
/// # Examples
///
/// ```
/// use header_binding::{BindError, ConversionErrorKind};
///
/// let error = BindError::new(ConversionErrorKind::InvalidInteger, "Address.IntProperty", "10x");
/// assert_eq!(error.kind(), ConversionErrorKind::InvalidInteger);
/// assert_eq!(error.attempted_value(), "10x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    kind: ConversionErrorKind,
    model_name: String,
    attempted_value: String,
}

impl BindError {
    /// Creates a new bind error.
    pub fn new(
        kind: ConversionErrorKind,
        model_name: impl Into<String>,
        attempted_value: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            model_name: model_name.into(),
            attempted_value: attempted_value.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ConversionErrorKind {
        self.kind
    }

    /// Returns the model name of the field that failed to convert.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the value the converter attempted to use.
    pub fn attempted_value(&self) -> &str {
        &self.attempted_value
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot bind '{}' ({}): the value '{}' is not valid",
            self.model_name, self.kind, self.attempted_value
        )
    }
}

impl std::error::Error for BindError {}

/// Kind of conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionErrorKind {
    /// Value is not a valid integer.
    InvalidInteger,
    /// Value is not a valid floating point number.
    InvalidFloat,
    /// Value is not `true` or `false`.
    InvalidBoolean,
    /// Value does not name a variant of the enumeration.
    UnknownVariant,
    /// The converter does not handle this shape.
    Unsupported,
}

impl fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInteger => write!(f, "invalid integer"),
            Self::InvalidFloat => write!(f, "invalid number"),
            Self::InvalidBoolean => write!(f, "invalid boolean"),
            Self::UnknownVariant => write!(f, "unknown variant"),
            Self::Unsupported => write!(f, "unsupported shape"),
        }
    }
}
