//! Type-shape metadata for bindable fields.
//!
//! Shapes are computed once by whoever owns the model metadata and handed to
//! the binder as plain data. The binder only ever matches on these tags.

use http::HeaderName;

use crate::error::Error;

/// Classification of a scalar or collection element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Convertible from a single string token.
    Simple(SimpleKind),
    /// Requires recursive, multi-field binding.
    Complex,
}

impl ElementKind {
    /// Returns `true` for simple kinds.
    pub fn is_simple(&self) -> bool {
        matches!(self, ElementKind::Simple(_))
    }
}

/// The simple types a single header token can be converted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleKind {
    /// Plain string, taken verbatim.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point number.
    Float,
    /// `true` or `false`, case-insensitive.
    Boolean,
    /// One of a fixed set of variant names, matched case-insensitively.
    Enumeration(&'static [&'static str]),
}

/// Declared collection type of a collection-shaped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionKind {
    /// Fixed ordered sequence of elements.
    Array,
    /// Read-only iteration interface over elements.
    Sequence,
    /// Growable list.
    List,
    /// Doubly-linked list.
    LinkedList,
    /// Double-ended queue.
    Deque,
    /// An abstraction with no known constructible implementation.
    Abstract(&'static str),
}

impl CollectionKind {
    /// Whether a plain ordered `Vec<String>` already satisfies this type.
    pub fn accepts_sequence(&self) -> bool {
        matches!(self, CollectionKind::Array | CollectionKind::Sequence)
    }
}

/// Shape of a bindable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A single value.
    Scalar(ElementKind),
    /// A collection of elements.
    Collection {
        /// The declared collection type
        kind: CollectionKind,
        /// The element classification
        element: ElementKind,
    },
}

impl TypeShape {
    /// Shape of a plain string field.
    pub fn text() -> Self {
        TypeShape::Scalar(ElementKind::Simple(SimpleKind::Text))
    }

    /// Shape of a scalar field of the given simple kind.
    pub fn scalar(kind: SimpleKind) -> Self {
        TypeShape::Scalar(ElementKind::Simple(kind))
    }

    /// Shape of a collection of the given simple kind.
    pub fn collection(kind: CollectionKind, element: SimpleKind) -> Self {
        TypeShape::Collection {
            kind,
            element: ElementKind::Simple(element),
        }
    }

    /// Shape of a `Vec<String>`-like field.
    pub fn strings() -> Self {
        Self::collection(CollectionKind::Array, SimpleKind::Text)
    }

    /// Returns `true` if values for this field are split into multiple tokens.
    pub fn is_collection(&self) -> bool {
        matches!(self, TypeShape::Collection { .. })
    }

    /// Returns `true` for `Scalar(Text)`.
    pub fn is_text(&self) -> bool {
        matches!(self, TypeShape::Scalar(ElementKind::Simple(SimpleKind::Text)))
    }
}

/// Whether the binder may replace the destination value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// The destination may receive a fresh instance.
    #[default]
    Assignable,
    /// The destination is a read-only slot; an existing instance may only be
    /// mutated in place.
    ReadOnly,
}

/// Identifies a single bindable field.
///
/// # Examples
///
/// ```
/// use header_binding::{FieldDescriptor, TypeShape};
///
/// let field = FieldDescriptor::new("Accept", TypeShape::strings())
///     .unwrap()
///     .with_model_name("Request.Accept");
///
/// assert_eq!(field.field_name(), "Accept");
/// assert_eq!(field.model_name(), "Request.Accept");
///
/// assert!(FieldDescriptor::new("", TypeShape::text()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    field_name: String,
    model_name: String,
    shape: TypeShape,
    access: Access,
}

impl FieldDescriptor {
    /// Creates a descriptor whose model name equals its field name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyFieldName`] or [`Error::InvalidHeaderName`] if
    /// `field_name` cannot select a header.
    pub fn new(field_name: impl Into<String>, shape: TypeShape) -> Result<Self, Error> {
        let field_name = field_name.into();
        if field_name.is_empty() {
            return Err(Error::EmptyFieldName);
        }
        if HeaderName::from_bytes(field_name.as_bytes()).is_err() {
            return Err(Error::InvalidHeaderName { name: field_name });
        }

        Ok(Self {
            model_name: field_name.clone(),
            field_name,
            shape,
            access: Access::Assignable,
        })
    }

    /// Sets the dotted model name used as the provenance key.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Prefixes the model name, as when the field is reached through a parent.
    ///
    /// An empty prefix leaves the name unchanged.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        if !prefix.is_empty() {
            self.model_name = format!("{}.{}", prefix, self.model_name);
        }
        self
    }

    /// Sets the destination access mode.
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Returns the header name this field reads from.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the provenance key.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the field's type shape.
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Returns the destination access mode.
    pub fn access(&self) -> Access {
        self.access
    }
}
