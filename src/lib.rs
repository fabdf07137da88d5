//! Binding of HTTP request header values to typed model fields.
//!
//! Given a request's headers and a description of a target field, this crate
//! extracts the matching header value(s), reshapes them to the field's
//! declared shape and hands them to a conversion step, recording which raw
//! strings produced each bound value so a validator can report on them.
//!
//! # Core Types
//!
//! - [`FieldDescriptor`]: Header name, model name and [`TypeShape`] of a field
//! - [`HeaderBinder`]: Binds one field, standalone or by delegating to an inner [`ModelBinder`]
//! - [`HeaderBinderProvider`]: Hands out header binders for eligible fields
//! - [`HeaderValueProvider`]: Exposes extracted tokens to a delegate binder
//! - [`ProvenanceMap`]: Attempted and raw values per model name
//!
//! # Splitting Rules
//!
//! Scalar fields receive the literal header text. Collection fields receive
//! the header split on commas outside double quotes:
//!
//! ```
//! use header_binding::split_comma_separated;
//!
//! assert_eq!(split_comma_separated(r#"foo, "bar""#), vec!["foo", "bar"]);
//! assert_eq!(split_comma_separated(r#""foo,bar""#), vec!["foo,bar"]);
//! ```
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use header_binding::{BindingContext, FieldDescriptor, HeaderBinder, ModelBinder,
//!     ProvenanceMap, RawValue, RequestHeaders, SimpleConverter, SimpleKind, TypeShape, Value};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let headers = RequestHeaders::new().with_header("X-Count", "10");
//! let provenance = ProvenanceMap::new();
//! let field = FieldDescriptor::new("X-Count", TypeShape::scalar(SimpleKind::Integer))
//!     .unwrap()
//!     .with_prefix("Order");
//! let mut context = BindingContext::new(&headers, &provenance, field);
//!
//! let binder = HeaderBinder::with_inner(Arc::new(SimpleConverter));
//! let bound = binder.bind_model(&mut context).await.unwrap();
//!
//! assert_eq!(bound.model(), Some(&Value::Integer(10)));
//! let record = provenance.get("Order.X-Count").unwrap();
//! assert_eq!(record.raw_value(), &RawValue::Single("10".to_string()));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod binder;
mod collection;
mod context;
mod convert;
mod diagnostics;
mod error;
mod extract;
mod headers;
mod provenance;
mod provider;
mod shape;
mod value;
mod value_provider;

pub use binder::{HeaderBinder, HeaderBinderBuilder, ModelBinder};
pub use collection::{materialize, CollectionTarget, ExistingCollection, StringCollection};
pub use context::{BindingContext, NestedScope};
pub use convert::SimpleConverter;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{BindError, ConversionErrorKind, Error};
pub use extract::{extract, RawTokens, SplitMode};
pub use headers::{split_comma_separated, HeaderSource, RequestHeaders};
pub use provenance::{ProvenanceMap, ProvenanceRecord, ProvenanceSink, RawValue};
pub use provider::{is_eligible, BindingSource, HeaderBinderProvider};
pub use shape::{Access, CollectionKind, ElementKind, FieldDescriptor, SimpleKind, TypeShape};
pub use value::{BoundValue, Value};
pub use value_provider::{EmptyValueProvider, HeaderValueProvider, ProviderValue, ValueProvider};
