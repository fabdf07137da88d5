//! A delegate binder for simple types and collections of simple types.

use async_trait::async_trait;

use crate::binder::ModelBinder;
use crate::collection::{materialize, CollectionTarget};
use crate::context::BindingContext;
use crate::error::{BindError, ConversionErrorKind};
use crate::shape::{CollectionKind, ElementKind, SimpleKind, TypeShape};
use crate::value::{BoundValue, Value};

/// Converts raw strings from the context's value provider into typed values.
///
/// It reads only through [`BindingContext::value_provider`], so it works the
/// same for header values and any other source. A missing value is not an
/// error here; a caller's required-field rule decides that.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use header_binding::{HeaderBinder, SimpleConverter};
///
/// let binder = HeaderBinder::with_inner(Arc::new(SimpleConverter));
/// assert!(binder.has_inner());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleConverter;

#[async_trait]
impl ModelBinder for SimpleConverter {
    async fn bind_model(&self, context: &mut BindingContext<'_>) -> Result<BoundValue, BindError> {
        let provider = context.value_provider();
        if !provider.contains_prefix(context.model_name()) {
            return Ok(BoundValue::absent());
        }
        let value = provider.get_value(context.model_name());

        match context.shape().clone() {
            TypeShape::Scalar(ElementKind::Simple(kind)) => {
                let Some(raw) = value.first_value() else {
                    return Ok(BoundValue::absent());
                };
                if raw.trim().is_empty() && kind != SimpleKind::Text {
                    return Ok(BoundValue::failed());
                }
                convert_scalar(&kind, raw)
                    .map(BoundValue::success)
                    .map_err(|k| BindError::new(k, context.model_name(), raw))
            }
            // An empty token list still reaches `materialize`, which decides
            // by the top-level flag.
            TypeShape::Collection {
                kind,
                element: ElementKind::Simple(SimpleKind::Text),
            } => {
                let target = context.take_target();
                let bound = materialize(
                    value.values().to_vec(),
                    &kind,
                    context.is_top_level(),
                    target,
                )
                .map(|collection| BoundValue::success(Value::Strings(collection)))
                .unwrap_or_else(BoundValue::failed);
                Ok(bound)
            }
            TypeShape::Collection {
                kind,
                element: ElementKind::Simple(element),
            } => {
                if matches!(kind, CollectionKind::Abstract(_)) {
                    return Ok(BoundValue::failed());
                }
                if value.is_none() && !context.is_top_level() {
                    return Ok(BoundValue::failed());
                }
                // Typed lists are always built fresh.
                if let CollectionTarget::ReadOnly(_) = context.take_target() {
                    return Ok(BoundValue::failed());
                }
                let items = value
                    .values()
                    .iter()
                    .map(|raw| {
                        convert_scalar(&element, raw)
                            .map_err(|k| BindError::new(k, context.model_name(), raw.as_str()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(BoundValue::success(Value::List(items)))
            }
            _ => Err(BindError::new(
                ConversionErrorKind::Unsupported,
                context.model_name(),
                value.joined(),
            )),
        }
    }
}

/// Converts one token into a value of `kind`.
pub(crate) fn convert_scalar(kind: &SimpleKind, raw: &str) -> Result<Value, ConversionErrorKind> {
    match kind {
        SimpleKind::Text => Ok(Value::Text(raw.to_string())),
        SimpleKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| ConversionErrorKind::InvalidInteger),
        SimpleKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ConversionErrorKind::InvalidFloat),
        SimpleKind::Boolean => {
            let raw = raw.trim();
            if raw.eq_ignore_ascii_case("true") {
                Ok(Value::Boolean(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(Value::Boolean(false))
            } else {
                Err(ConversionErrorKind::InvalidBoolean)
            }
        }
        SimpleKind::Enumeration(variants) => {
            let raw = raw.trim();
            variants
                .iter()
                .find(|variant| variant.eq_ignore_ascii_case(raw))
                .map(|variant| Value::Enumeration(variant.to_string()))
                .ok_or(ConversionErrorKind::UnknownVariant)
        }
    }
}
