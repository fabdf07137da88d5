//! Property tests for header extraction and binding.
//!
//! These validate the splitting rules and the binder's observable
//! invariants over generated header values.

use std::sync::Arc;

use header_binding::{
    extract, split_comma_separated, BindingContext, FieldDescriptor, HeaderBinder, ModelBinder,
    ProvenanceMap, RequestHeaders, SimpleConverter, TypeShape, Value,
};
use proptest::prelude::*;

// Strategy: tokens that survive a join/split round trip unchanged
fn arb_token() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9/;=.+*-][A-Za-z0-9/;=.+* -]{0,10}[A-Za-z0-9/;=.+*-]")
        .unwrap()
}

// Strategy: printable header text, including commas and quotes
fn arb_header_value() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{1,40}").unwrap()
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    /// Property: joining tokens with commas and splitting again is lossless
    #[test]
    fn proptest_split_round_trips_plain_tokens(tokens in prop::collection::vec(arb_token(), 0..8)) {
        let joined = tokens.join(",");
        prop_assert_eq!(split_comma_separated(&joined), tokens.clone());

        let spaced = tokens.join(" , ");
        prop_assert_eq!(split_comma_separated(&spaced), tokens);
    }

    /// Property: quoting a token protects its commas
    #[test]
    fn proptest_quoted_commas_are_not_split(a in arb_token(), b in arb_token()) {
        let value = format!("\"{},{}\"", a, b);
        prop_assert_eq!(split_comma_separated(&value), vec![format!("{},{}", a, b)]);
    }

    /// Property: split tokens are never empty and never carry outer whitespace
    #[test]
    fn proptest_split_tokens_are_trimmed(value in arb_header_value()) {
        for token in split_comma_separated(&value) {
            prop_assert!(!token.is_empty());
            if !value.contains('"') {
                prop_assert_eq!(token.trim(), token.as_str());
            }
        }
    }

    /// Property: a string field receives the literal header text
    #[test]
    fn proptest_scalar_string_is_verbatim(value in arb_header_value()) {
        let headers = RequestHeaders::new().with_header("X-Value", value.clone());
        let raw = extract(&headers, "X-Value", &TypeShape::text());
        prop_assert_eq!(raw.tokens(), [value.clone()]);

        let provenance = ProvenanceMap::new();
        let field = FieldDescriptor::new("X-Value", TypeShape::text()).unwrap();
        let mut context = BindingContext::new(&headers, &provenance, field);
        let bound = block_on(HeaderBinder::standalone().bind_model(&mut context)).unwrap();
        prop_assert_eq!(bound.model(), Some(&Value::Text(value)));
    }

    /// Property: binding twice gives the same value and the same record
    #[test]
    fn proptest_binding_is_idempotent(value in arb_header_value(), collection in any::<bool>()) {
        let shape = if collection { TypeShape::strings() } else { TypeShape::text() };
        let headers = RequestHeaders::new().with_header("X-Value", value);
        let provenance = ProvenanceMap::new();
        let binder = HeaderBinder::with_inner(Arc::new(SimpleConverter));

        let bind = || {
            let field = FieldDescriptor::new("X-Value", shape.clone()).unwrap();
            let mut context = BindingContext::new(&headers, &provenance, field);
            let bound = block_on(binder.bind_model(&mut context)).unwrap();
            (bound, provenance.get("X-Value"))
        };

        let first = bind();
        let second = bind();
        prop_assert_eq!(first, second);
    }

    /// Property: an absent header never produces a value or a record
    #[test]
    fn proptest_absent_header_binds_nothing(name in "[A-Za-z][A-Za-z0-9-]{0,15}", collection in any::<bool>()) {
        let shape = if collection { TypeShape::strings() } else { TypeShape::text() };
        let headers = RequestHeaders::new();
        let provenance = ProvenanceMap::new();
        let field = FieldDescriptor::new(name, shape).unwrap();
        let mut context = BindingContext::new(&headers, &provenance, field);

        let bound = block_on(HeaderBinder::standalone().bind_model(&mut context)).unwrap();

        prop_assert!(!bound.is_model_set());
        prop_assert!(provenance.is_empty());
    }
}
