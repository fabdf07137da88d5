//! The header binding orchestrator.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::collection::materialize;
use crate::context::BindingContext;
use crate::diagnostics::Diagnostics;
use crate::error::BindError;
use crate::extract::{extract, RawTokens};
use crate::provenance::{ProvenanceRecord, RawValue};
use crate::shape::{ElementKind, SimpleKind, TypeShape};
use crate::value::{BoundValue, Value};
use crate::value_provider::HeaderValueProvider;

/// Binds one field from the values in its context.
///
/// Binders may suspend, for example while a converter consults an external
/// service. Absence and incompatibility are reported through [`BoundValue`];
/// `Err` is reserved for conversion failures a validator should report.
#[async_trait]
pub trait ModelBinder: Send + Sync {
    /// Binds the field described by `context`.
    async fn bind_model(&self, context: &mut BindingContext<'_>) -> Result<BoundValue, BindError>;
}

/// Binds fields from request headers.
///
/// With an inner binder (composition mode), the header binder extracts the
/// header tokens, exposes them through a [`HeaderValueProvider`] in a nested
/// scope, and lets the inner binder convert them. Without one (standalone
/// mode), it binds `String` fields and string collections itself.
///
/// Provenance is recorded under the field's model name whenever the header is
/// present and the bind either succeeds or fails conversion. Absent headers
/// and incompatible destinations record nothing.
///
/// # Examples
///
/// ```
/// use header_binding::{BindingContext, FieldDescriptor, HeaderBinder, ModelBinder,
///     ProvenanceMap, RequestHeaders, TypeShape, Value};
///
/// # tokio_test_block(async {
/// let headers = RequestHeaders::new().with_header("User-Agent", "UnitTest");
/// let provenance = ProvenanceMap::new();
/// let field = FieldDescriptor::new("User-Agent", TypeShape::text()).unwrap();
/// let mut context = BindingContext::new(&headers, &provenance, field);
///
/// let bound = HeaderBinder::standalone().bind_model(&mut context).await.unwrap();
/// assert_eq!(bound.model(), Some(&Value::Text("UnitTest".to_string())));
/// assert!(provenance.contains("User-Agent"));
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone, Default)]
pub struct HeaderBinder {
    inner: Option<Arc<dyn ModelBinder>>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl HeaderBinder {
    /// A binder that handles `String` fields and string collections itself.
    pub fn standalone() -> Self {
        Self::default()
    }

    /// A binder that delegates conversion to `inner`.
    pub fn with_inner(inner: Arc<dyn ModelBinder>) -> Self {
        Self {
            inner: Some(inner),
            diagnostics: None,
        }
    }

    /// Starts building a binder.
    pub fn builder() -> HeaderBinderBuilder {
        HeaderBinderBuilder::default()
    }

    /// Returns `true` if conversion is delegated to an inner binder.
    pub fn has_inner(&self) -> bool {
        self.inner.is_some()
    }

    async fn bind_with_inner(
        &self,
        inner: &dyn ModelBinder,
        context: &mut BindingContext<'_>,
    ) -> Result<BoundValue, BindError> {
        let raw = extract(context.headers(), context.field_name(), context.shape());
        let present = raw.is_present();
        let record = present.then(|| provenance_of(&raw, context.shape()));
        let provider = HeaderValueProvider::new(context.field_name(), raw);

        // Entering a scope clears the top-level flag; the delegate must still
        // see it for a top-level field.
        let is_top_level = context.is_top_level();
        let field = context.field().clone();
        let result = {
            let mut scope = context.enter_nested_scope(field);
            scope.set_top_level(is_top_level);
            scope.set_value_provider(Arc::new(provider));
            inner.bind_model(&mut *scope).await
        };

        let keep_record = match &result {
            Ok(bound) => bound.is_model_set(),
            Err(_) => true,
        };
        if let (true, Some(record)) = (keep_record, record) {
            context.provenance().record(context.model_name(), record);
        }

        result.map(|bound| BoundValue::from_parts(bound.into_model(), present))
    }

    fn bind_without_inner(&self, context: &mut BindingContext<'_>) -> BoundValue {
        let raw = extract(context.headers(), context.field_name(), context.shape());
        if !raw.is_present() {
            return BoundValue::absent();
        }

        let shape = context.shape().clone();
        let model = match &shape {
            shape if shape.is_text() => raw.tokens().first().cloned().map(Value::Text),
            TypeShape::Collection {
                kind,
                element: ElementKind::Simple(SimpleKind::Text),
            } => {
                let target = context.take_target();
                materialize(raw.tokens().to_vec(), kind, context.is_top_level(), target)
                    .map(Value::Strings)
            }
            // Not a shape this binder can produce; let something else try.
            _ => None,
        };

        match model {
            Some(model) => {
                let record = provenance_of(&raw, &shape);
                context.provenance().record(context.model_name(), record);
                BoundValue::success(model)
            }
            None => BoundValue::failed(),
        }
    }
}

#[async_trait]
impl ModelBinder for HeaderBinder {
    async fn bind_model(&self, context: &mut BindingContext<'_>) -> Result<BoundValue, BindError> {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.attempting_to_bind(context.field_name(), context.model_name());
            if !context.headers().contains(context.field_name()) {
                // Not a failure: the inner binder decides whether absence matters.
                diagnostics.found_no_value(context.field_name(), context.model_name());
            }
        }

        let result = match &self.inner {
            Some(inner) => self.bind_with_inner(inner.as_ref(), context).await,
            None => Ok(self.bind_without_inner(context)),
        };

        if let Some(diagnostics) = &self.diagnostics {
            let bound = matches!(&result, Ok(bound) if bound.is_model_set());
            diagnostics.done_attempting_to_bind(context.field_name(), context.model_name(), bound);
        }

        result
    }
}

impl fmt::Debug for HeaderBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderBinder")
            .field("has_inner", &self.inner.is_some())
            .field("has_diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

/// Builder for [`HeaderBinder`].
#[derive(Default)]
pub struct HeaderBinderBuilder {
    inner: Option<Arc<dyn ModelBinder>>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl HeaderBinderBuilder {
    /// Delegates conversion to `inner`.
    pub fn inner(mut self, inner: Arc<dyn ModelBinder>) -> Self {
        self.inner = Some(inner);
        self
    }

    /// Sends progress events to `diagnostics`.
    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Sends progress events to `diagnostics` if one is given.
    pub fn maybe_diagnostics(mut self, diagnostics: Option<Arc<dyn Diagnostics>>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Builds the binder.
    pub fn build(self) -> HeaderBinder {
        HeaderBinder {
            inner: self.inner,
            diagnostics: self.diagnostics,
        }
    }
}

fn provenance_of(raw: &RawTokens, shape: &TypeShape) -> ProvenanceRecord {
    if shape.is_collection() {
        ProvenanceRecord::new(raw.attempted_value(), RawValue::Many(raw.tokens().to_vec()))
    } else {
        let text = raw.tokens().first().cloned().unwrap_or_default();
        ProvenanceRecord::new(text.clone(), RawValue::Single(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{ExistingCollection, StringCollection};
    use crate::convert::SimpleConverter;
    use crate::error::ConversionErrorKind;
    use crate::headers::RequestHeaders;
    use crate::provenance::{ProvenanceMap, ProvenanceSink};
    use crate::shape::{Access, CollectionKind, FieldDescriptor};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDiagnostics {
        events: Mutex<Vec<String>>,
    }

    impl Diagnostics for RecordingDiagnostics {
        fn attempting_to_bind(&self, field_name: &str, _model_name: &str) {
            self.events.lock().unwrap().push(format!("attempt {}", field_name));
        }

        fn found_no_value(&self, field_name: &str, _model_name: &str) {
            self.events.lock().unwrap().push(format!("missing {}", field_name));
        }

        fn done_attempting_to_bind(&self, field_name: &str, _model_name: &str, bound: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {} {}", field_name, bound));
        }
    }

    /// Captures what a delegate sees through its context.
    struct SpyBinder {
        seen: Mutex<Option<(bool, Vec<String>)>>,
    }

    #[async_trait]
    impl ModelBinder for SpyBinder {
        async fn bind_model(
            &self,
            context: &mut BindingContext<'_>,
        ) -> Result<BoundValue, BindError> {
            let value = context.value_provider().get_value("unrelated.key");
            *self.seen.lock().unwrap() = Some((context.is_top_level(), value.values().to_vec()));
            Ok(BoundValue::failed())
        }
    }

    fn field(name: &str, shape: TypeShape) -> FieldDescriptor {
        FieldDescriptor::new(name, shape).unwrap()
    }

    #[tokio::test]
    async fn standalone_binds_string_verbatim() {
        let headers = RequestHeaders::new().with_header("User-Agent", "Mozilla/5.0, \"x\"");
        let provenance = ProvenanceMap::new();
        let mut context =
            BindingContext::new(&headers, &provenance, field("User-Agent", TypeShape::text()));

        let bound = HeaderBinder::standalone()
            .bind_model(&mut context)
            .await
            .unwrap();

        assert_eq!(
            bound.model(),
            Some(&Value::Text("Mozilla/5.0, \"x\"".to_string()))
        );
        let record = provenance.get("User-Agent").unwrap();
        assert_eq!(record.raw_value(), &RawValue::Single("Mozilla/5.0, \"x\"".to_string()));
    }

    #[tokio::test]
    async fn standalone_binds_string_collection() {
        let headers = RequestHeaders::new().with_header("Accept", "application/json,text/json");
        let provenance = ProvenanceMap::new();
        let mut context =
            BindingContext::new(&headers, &provenance, field("Accept", TypeShape::strings()));

        let bound = HeaderBinder::standalone()
            .bind_model(&mut context)
            .await
            .unwrap();

        let expected = vec!["application/json".to_string(), "text/json".to_string()];
        assert_eq!(
            bound.model(),
            Some(&Value::Strings(StringCollection::Vec(expected.clone())))
        );
        let record = provenance.get("Accept").unwrap();
        assert_eq!(record.attempted_value(), "application/json,text/json");
        assert_eq!(record.raw_value(), &RawValue::Many(expected));
    }

    #[tokio::test]
    async fn standalone_absent_header_records_nothing() {
        let headers = RequestHeaders::new();
        let provenance = ProvenanceMap::new();

        for shape in [TypeShape::text(), TypeShape::strings()] {
            let mut context = BindingContext::new(&headers, &provenance, field("Header", shape));
            let bound = HeaderBinder::standalone()
                .bind_model(&mut context)
                .await
                .unwrap();
            assert!(!bound.is_model_set());
            assert!(!bound.was_attempted());
        }
        assert!(provenance.is_empty());
    }

    #[tokio::test]
    async fn standalone_fails_silently_for_other_shapes() {
        let headers = RequestHeaders::new().with_header("X-Count", "10");
        let provenance = ProvenanceMap::new();
        let shape = TypeShape::scalar(SimpleKind::Integer);
        let mut context = BindingContext::new(&headers, &provenance, field("X-Count", shape));

        let bound = HeaderBinder::standalone()
            .bind_model(&mut context)
            .await
            .unwrap();

        assert!(!bound.is_model_set());
        assert!(bound.was_attempted());
        assert!(provenance.is_empty());
    }

    #[tokio::test]
    async fn standalone_uncreatable_collection_records_nothing() {
        let headers = RequestHeaders::new().with_header("Accept", "application/json,text/json");
        let provenance = ProvenanceMap::new();
        let shape = TypeShape::collection(CollectionKind::Abstract("ReadOnlySet"), SimpleKind::Text);
        let mut context = BindingContext::new(&headers, &provenance, field("Accept", shape));

        let bound = HeaderBinder::standalone()
            .bind_model(&mut context)
            .await
            .unwrap();

        assert!(!bound.is_model_set());
        assert!(bound.model().is_none());
        assert!(provenance.is_empty());
    }

    #[tokio::test]
    async fn standalone_fills_read_only_destination() {
        let headers = RequestHeaders::new().with_header("Header", "someValue");
        let provenance = ProvenanceMap::new();
        let read_only = field(
            "Header",
            TypeShape::collection(CollectionKind::List, SimpleKind::Text),
        )
        .with_access(Access::ReadOnly);
        let existing = ExistingCollection::mutable(StringCollection::Vec(vec!["old".to_string()]));
        let mut context = BindingContext::new(&headers, &provenance, read_only)
            .nested()
            .with_existing(existing);

        let bound = HeaderBinder::standalone()
            .bind_model(&mut context)
            .await
            .unwrap();

        assert_eq!(
            bound.model(),
            Some(&Value::Strings(StringCollection::Vec(vec!["someValue".to_string()])))
        );
    }

    #[tokio::test]
    async fn standalone_read_only_destination_without_instance_fails() {
        let headers = RequestHeaders::new().with_header("Header", "someValue");
        let provenance = ProvenanceMap::new();
        let read_only = field(
            "Header",
            TypeShape::collection(CollectionKind::List, SimpleKind::Text),
        )
        .with_access(Access::ReadOnly);
        let mut context = BindingContext::new(&headers, &provenance, read_only).nested();

        let bound = HeaderBinder::standalone()
            .bind_model(&mut context)
            .await
            .unwrap();

        assert!(!bound.is_model_set());
        assert!(bound.was_attempted());
        assert!(provenance.is_empty());
    }

    #[tokio::test]
    async fn standalone_frozen_read_only_destination_fails() {
        let headers = RequestHeaders::new().with_header("Header", "someValue");
        let provenance = ProvenanceMap::new();
        let read_only = field("Header", TypeShape::strings()).with_access(Access::ReadOnly);
        let existing = ExistingCollection::frozen(StringCollection::Vec(Vec::new()));
        let mut context =
            BindingContext::new(&headers, &provenance, read_only).with_existing(existing);

        let bound = HeaderBinder::standalone()
            .bind_model(&mut context)
            .await
            .unwrap();

        assert!(!bound.is_model_set());
        assert!(provenance.is_empty());
    }

    #[tokio::test]
    async fn nested_blank_collection_is_not_bound() {
        let headers = RequestHeaders::new().with_header("Accept", " , ");
        let provenance = ProvenanceMap::new();

        let mut nested = BindingContext::new(&headers, &provenance, field("Accept", TypeShape::strings()))
            .nested();
        let bound = HeaderBinder::standalone().bind_model(&mut nested).await.unwrap();
        assert!(!bound.is_model_set());

        let mut top = BindingContext::new(&headers, &provenance, field("Accept", TypeShape::strings()));
        let bound = HeaderBinder::standalone().bind_model(&mut top).await.unwrap();
        assert_eq!(
            bound.model(),
            Some(&Value::Strings(StringCollection::Vec(Vec::new())))
        );
    }

    #[tokio::test]
    async fn delegate_sees_header_tokens_and_top_level_flag() {
        let headers = RequestHeaders::new().with_header("CustomParameter", "a, b");
        let provenance = ProvenanceMap::new();
        let spy = Arc::new(SpyBinder {
            seen: Mutex::new(None),
        });
        let binder = HeaderBinder::with_inner(spy.clone());
        let shape = TypeShape::strings();
        let descriptor = field("CustomParameter", shape).with_model_name("Parameter1");
        let mut context = BindingContext::new(&headers, &provenance, descriptor);

        let bound = binder.bind_model(&mut context).await.unwrap();

        let seen = spy.seen.lock().unwrap().clone().unwrap();
        assert!(seen.0, "top-level flag must survive the nested scope");
        assert_eq!(seen.1, vec!["a".to_string(), "b".to_string()]);
        assert!(!bound.is_model_set());
        assert!(bound.was_attempted());
        // Delegate soft failure records nothing.
        assert!(provenance.is_empty());
        // Scope is restored.
        assert!(!context.value_provider().contains_prefix(""));
    }

    #[tokio::test]
    async fn delegate_keeps_nested_fields_nested() {
        let headers = RequestHeaders::new().with_header("Header", "x");
        let provenance = ProvenanceMap::new();
        let spy = Arc::new(SpyBinder {
            seen: Mutex::new(None),
        });
        let binder = HeaderBinder::with_inner(spy.clone());
        let mut context =
            BindingContext::new(&headers, &provenance, field("Header", TypeShape::text())).nested();

        binder.bind_model(&mut context).await.unwrap();

        let seen = spy.seen.lock().unwrap().clone().unwrap();
        assert!(!seen.0);
        assert_eq!(seen.1, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn delegate_conversion_error_passes_through_with_provenance() {
        let headers = RequestHeaders::new().with_header("IntProperty", "10x");
        let provenance = ProvenanceMap::new();
        let binder = HeaderBinder::with_inner(Arc::new(SimpleConverter));
        let descriptor = field("IntProperty", TypeShape::scalar(SimpleKind::Integer))
            .with_prefix("Address");
        let mut context = BindingContext::new(&headers, &provenance, descriptor);

        let err = binder.bind_model(&mut context).await.unwrap_err();

        assert_eq!(err.kind(), ConversionErrorKind::InvalidInteger);
        assert_eq!(err.model_name(), "Address.IntProperty");
        let record = provenance.get("Address.IntProperty").unwrap();
        assert_eq!(record.attempted_value(), "10x");
        assert_eq!(context.field_name(), "IntProperty");
    }

    #[tokio::test]
    async fn delegate_absent_header_records_nothing() {
        let headers = RequestHeaders::new();
        let provenance = ProvenanceMap::new();
        let binder = HeaderBinder::with_inner(Arc::new(SimpleConverter));
        let mut context = BindingContext::new(
            &headers,
            &provenance,
            field("Header", TypeShape::scalar(SimpleKind::Integer)),
        );

        let bound = binder.bind_model(&mut context).await.unwrap();

        assert!(!bound.is_model_set());
        assert!(!bound.was_attempted());
        assert!(provenance.is_empty());
    }

    #[tokio::test]
    async fn diagnostics_report_progress() {
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let binder = HeaderBinder::builder()
            .diagnostics(diagnostics.clone())
            .build();
        let headers = RequestHeaders::new();
        let provenance = ProvenanceMap::new();
        let mut context =
            BindingContext::new(&headers, &provenance, field("Header", TypeShape::text()));

        binder.bind_model(&mut context).await.unwrap();

        assert_eq!(
            *diagnostics.events.lock().unwrap(),
            vec![
                "attempt Header".to_string(),
                "missing Header".to_string(),
                "done Header false".to_string(),
            ]
        );
    }

    #[test]
    fn provenance_sink_is_object_safe() {
        let map = ProvenanceMap::new();
        let sink: &dyn ProvenanceSink = &map;
        sink.record("k", ProvenanceRecord::new("v", RawValue::Single("v".into())));
        assert!(map.contains("k"));
    }
}
