/// Receives binder progress events.
///
/// Diagnostics are informational only; nothing a sink does can change a bind
/// outcome. A binder without a sink drops them.
pub trait Diagnostics: Send + Sync {
    /// A bind is starting.
    fn attempting_to_bind(&self, field_name: &str, model_name: &str);

    /// The request has no header for the field.
    fn found_no_value(&self, field_name: &str, model_name: &str);

    /// A bind finished; `bound` is `true` if a model was set.
    fn done_attempting_to_bind(&self, field_name: &str, model_name: &str, bound: bool);
}

/// Emits diagnostics as `tracing` debug events.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use header_binding::{HeaderBinder, TracingDiagnostics};
///
/// let binder = HeaderBinder::builder()
///     .diagnostics(Arc::new(TracingDiagnostics))
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn attempting_to_bind(&self, field_name: &str, model_name: &str) {
        tracing::debug!(field = %field_name, model = %model_name, "attempting to bind model from header");
    }

    fn found_no_value(&self, field_name: &str, model_name: &str) {
        tracing::debug!(field = %field_name, model = %model_name, "could not find a header for the field");
    }

    fn done_attempting_to_bind(&self, field_name: &str, model_name: &str, bound: bool) {
        tracing::debug!(
            field = %field_name,
            model = %model_name,
            bound,
            "done attempting to bind model from header"
        );
    }
}
