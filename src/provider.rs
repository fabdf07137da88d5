//! Selection of the header binder for eligible fields.

use std::fmt;
use std::sync::Arc;

use crate::binder::{HeaderBinder, ModelBinder};
use crate::diagnostics::Diagnostics;
use crate::shape::{ElementKind, TypeShape};

/// Where a field's value is declared to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSource {
    /// Request headers.
    Header,
    /// The query string.
    Query,
    /// Route path parameters.
    Path,
    /// The request body.
    Body,
    /// The general-purpose value sources (query and path), never headers.
    ModelBinding,
}

impl BindingSource {
    /// Returns `true` if a field declared with `self` may take data from `source`.
    pub fn can_accept_data_from(&self, source: BindingSource) -> bool {
        match (self, source) {
            (a, b) if *a == b => true,
            (BindingSource::ModelBinding, BindingSource::Query | BindingSource::Path) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BindingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingSource::Header => write!(f, "Header"),
            BindingSource::Query => write!(f, "Query"),
            BindingSource::Path => write!(f, "Path"),
            BindingSource::Body => write!(f, "Body"),
            BindingSource::ModelBinding => write!(f, "ModelBinding"),
        }
    }
}

/// Returns `true` if header binding may handle a field of `shape`.
///
/// Only simple scalars and collections of simple elements qualify; complex
/// objects are never synthesized from a single header.
///
/// # Examples
///
/// ```
/// use header_binding::{is_eligible, CollectionKind, ElementKind, TypeShape};
///
/// assert!(is_eligible(&TypeShape::text()));
/// assert!(is_eligible(&TypeShape::strings()));
/// assert!(!is_eligible(&TypeShape::Scalar(ElementKind::Complex)));
/// assert!(!is_eligible(&TypeShape::Collection {
///     kind: CollectionKind::List,
///     element: ElementKind::Complex,
/// }));
/// ```
pub fn is_eligible(shape: &TypeShape) -> bool {
    match shape {
        TypeShape::Scalar(element) | TypeShape::Collection { element, .. } => {
            matches!(element, ElementKind::Simple(_))
        }
    }
}

/// Creates [`HeaderBinder`]s for fields bound from headers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use header_binding::{BindingSource, HeaderBinderProvider, ModelBinder, SimpleConverter, TypeShape};
///
/// let provider = HeaderBinderProvider::new();
/// let binder = provider.get_binder(&TypeShape::text(), Some(BindingSource::Header), |_, source| {
///     assert_eq!(source, BindingSource::ModelBinding);
///     Some(Arc::new(SimpleConverter) as Arc<dyn ModelBinder>)
/// });
/// assert!(binder.is_some());
///
/// let binder = provider.get_binder(&TypeShape::text(), Some(BindingSource::Query), |_, _| None);
/// assert!(binder.is_none());
/// ```
#[derive(Clone, Default)]
pub struct HeaderBinderProvider {
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl HeaderBinderProvider {
    /// Creates a provider whose binders drop diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider whose binders report to `diagnostics`.
    pub fn with_diagnostics(diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            diagnostics: Some(diagnostics),
        }
    }

    /// Returns a binder for a field of `shape` declared with `source`.
    ///
    /// `create_inner` is asked for the delegate binder with
    /// [`BindingSource::ModelBinding`] so it can never hand back another
    /// header binder. Returns `None` if the source does not accept header
    /// data, the shape is not eligible, or no delegate can be created.
    pub fn get_binder<F>(
        &self,
        shape: &TypeShape,
        source: Option<BindingSource>,
        create_inner: F,
    ) -> Option<HeaderBinder>
    where
        F: FnOnce(&TypeShape, BindingSource) -> Option<Arc<dyn ModelBinder>>,
    {
        let source = source?;
        if !source.can_accept_data_from(BindingSource::Header) || !is_eligible(shape) {
            return None;
        }

        let inner = create_inner(shape, BindingSource::ModelBinding)?;
        Some(
            HeaderBinder::builder()
                .inner(inner)
                .maybe_diagnostics(self.diagnostics.clone())
                .build(),
        )
    }
}

impl fmt::Debug for HeaderBinderProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderBinderProvider")
            .field("has_diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}
