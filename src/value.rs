use crate::collection::StringCollection;

/// A typed value produced by a bind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string taken verbatim from the header.
    Text(String),
    /// A converted integer.
    Integer(i64),
    /// A converted floating point number.
    Float(f64),
    /// A converted boolean.
    Boolean(bool),
    /// The canonical name of an enumeration variant.
    Enumeration(String),
    /// A materialized collection of strings.
    Strings(StringCollection),
    /// A collection of converted values.
    List(Vec<Value>),
}

/// Outcome of binding one field.
///
/// `attempted` records whether the header was present; a caller's
/// required-field rule treats "attempted but no value" and "absent"
/// differently.
///
/// # Examples
///
/// ```
/// use header_binding::{BoundValue, Value};
///
/// let bound = BoundValue::success(Value::Text("UnitTest".to_string()));
/// assert!(bound.is_model_set());
///
/// let absent = BoundValue::absent();
/// assert!(!absent.is_model_set());
/// assert!(!absent.was_attempted());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoundValue {
    model: Option<Value>,
    attempted: bool,
}

impl BoundValue {
    /// A successfully bound value from a present header.
    pub fn success(model: Value) -> Self {
        Self {
            model: Some(model),
            attempted: true,
        }
    }

    /// The header was present but no value could be bound.
    pub fn failed() -> Self {
        Self {
            model: None,
            attempted: true,
        }
    }

    /// The header was not in the request.
    pub fn absent() -> Self {
        Self {
            model: None,
            attempted: false,
        }
    }

    pub(crate) fn from_parts(model: Option<Value>, attempted: bool) -> Self {
        Self { model, attempted }
    }

    /// Returns `true` if a value was bound.
    pub fn is_model_set(&self) -> bool {
        self.model.is_some()
    }

    /// Returns `true` if the header was present.
    pub fn was_attempted(&self) -> bool {
        self.attempted
    }

    /// Returns the bound value, if any.
    pub fn model(&self) -> Option<&Value> {
        self.model.as_ref()
    }

    /// Consumes `self`, returning the bound value.
    pub fn into_model(self) -> Option<Value> {
        self.model
    }
}
