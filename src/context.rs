use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::collection::{CollectionTarget, ExistingCollection};
use crate::headers::HeaderSource;
use crate::provenance::ProvenanceSink;
use crate::shape::{Access, FieldDescriptor, TypeShape};
use crate::value_provider::{EmptyValueProvider, ValueProvider};

/// State for binding one field of one request.
///
/// The context borrows the request's headers and the caller's provenance sink;
/// it owns everything that is specific to the field being bound.
///
/// # Examples
///
/// ```
/// use header_binding::{BindingContext, FieldDescriptor, ProvenanceMap, RequestHeaders, TypeShape};
///
/// let headers = RequestHeaders::new().with_header("User-Agent", "UnitTest");
/// let provenance = ProvenanceMap::new();
/// let field = FieldDescriptor::new("User-Agent", TypeShape::text()).unwrap();
///
/// let context = BindingContext::new(&headers, &provenance, field);
/// assert!(context.is_top_level());
/// assert_eq!(context.model_name(), "User-Agent");
/// ```
pub struct BindingContext<'a> {
    headers: &'a dyn HeaderSource,
    provenance: &'a dyn ProvenanceSink,
    field: FieldDescriptor,
    is_top_level: bool,
    value_provider: Arc<dyn ValueProvider>,
    existing: Option<ExistingCollection>,
}

impl<'a> BindingContext<'a> {
    /// Creates a top-level context with an empty value provider.
    pub fn new(
        headers: &'a dyn HeaderSource,
        provenance: &'a dyn ProvenanceSink,
        field: FieldDescriptor,
    ) -> Self {
        Self {
            headers,
            provenance,
            field,
            is_top_level: true,
            value_provider: Arc::new(EmptyValueProvider),
            existing: None,
        }
    }

    /// Marks the field as a property reached while binding a parent object.
    pub fn nested(mut self) -> Self {
        self.is_top_level = false;
        self
    }

    /// Supplies the instance currently held by a read-only destination.
    pub fn with_existing(mut self, existing: ExistingCollection) -> Self {
        self.existing = Some(existing);
        self
    }

    /// Replaces the value provider.
    pub fn with_value_provider(mut self, value_provider: Arc<dyn ValueProvider>) -> Self {
        self.value_provider = value_provider;
        self
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &'a dyn HeaderSource {
        self.headers
    }

    /// Returns the provenance sink.
    pub fn provenance(&self) -> &'a dyn ProvenanceSink {
        self.provenance
    }

    /// Returns the field being bound.
    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    /// Returns the header name of the field being bound.
    pub fn field_name(&self) -> &str {
        self.field.field_name()
    }

    /// Returns the provenance key of the field being bound.
    pub fn model_name(&self) -> &str {
        self.field.model_name()
    }

    /// Returns the shape of the field being bound.
    pub fn shape(&self) -> &TypeShape {
        self.field.shape()
    }

    /// Returns `true` if the field was named directly by the caller.
    pub fn is_top_level(&self) -> bool {
        self.is_top_level
    }

    /// Overrides the top-level flag.
    pub fn set_top_level(&mut self, is_top_level: bool) {
        self.is_top_level = is_top_level;
    }

    /// Returns the current value provider.
    pub fn value_provider(&self) -> &dyn ValueProvider {
        self.value_provider.as_ref()
    }

    /// Replaces the current value provider.
    pub fn set_value_provider(&mut self, value_provider: Arc<dyn ValueProvider>) {
        self.value_provider = value_provider;
    }

    /// Takes where a collection for this field must be materialized.
    ///
    /// Assignable destinations always receive a fresh instance. Read-only
    /// destinations carry their existing instance, or none if the caller
    /// supplied none.
    pub fn take_target(&mut self) -> CollectionTarget {
        match self.field.access() {
            Access::ReadOnly => CollectionTarget::ReadOnly(self.existing.take()),
            Access::Assignable => CollectionTarget::Assignable,
        }
    }

    /// Enters a nested scope for `field`.
    ///
    /// The scope starts non-top-level and keeps the current value provider.
    /// Dropping the returned guard restores the field, top-level flag and
    /// value provider, including when a delegate returns early or its future
    /// is dropped.
    pub fn enter_nested_scope(&mut self, field: FieldDescriptor) -> NestedScope<'_, 'a> {
        let saved = SavedScope {
            field: std::mem::replace(&mut self.field, field),
            is_top_level: self.is_top_level,
            value_provider: Arc::clone(&self.value_provider),
        };
        self.is_top_level = false;

        NestedScope {
            context: self,
            saved: Some(saved),
        }
    }
}

struct SavedScope {
    field: FieldDescriptor,
    is_top_level: bool,
    value_provider: Arc<dyn ValueProvider>,
}

/// Guard for a nested binding scope; see [`BindingContext::enter_nested_scope`].
pub struct NestedScope<'c, 'a> {
    context: &'c mut BindingContext<'a>,
    saved: Option<SavedScope>,
}

impl<'a> Deref for NestedScope<'_, 'a> {
    type Target = BindingContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl<'a> DerefMut for NestedScope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl Drop for NestedScope<'_, '_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.context.field = saved.field;
            self.context.is_top_level = saved.is_top_level;
            self.context.value_provider = saved.value_provider;
        }
    }
}
