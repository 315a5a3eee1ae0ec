//! Integration tests for error kinds, codes, and context

use xqlib_foundation::{CardinalityCheck, Error, ErrorContext, ErrorKind, ItemType};

#[test]
fn codes_by_kind() {
    assert_eq!(Error::type_mismatch("xs:string", "xs:integer").code(), "XPTY0004");
    assert_eq!(Error::invalid_argument("bad").code(), "FORG0006");
    assert_eq!(Error::unknown_function("fn:nope", 2).code(), "XPST0017");
    assert_eq!(Error::unsupported_collation("urn:x").code(), "FOCH0002");
    assert_eq!(Error::new(ErrorKind::InvalidCodepoint(0)).code(), "FOCH0001");
    assert_eq!(Error::new(ErrorKind::InvalidRegexFlags("k".into())).code(), "FORX0001");
    assert_eq!(Error::new(ErrorKind::RegexMatchesEmpty("a*".into())).code(), "FORX0003");
    assert_eq!(Error::new(ErrorKind::InvalidReplacement("$".into())).code(), "FORX0004");
    assert_eq!(Error::new(ErrorKind::NumericOverflow).code(), "FOAR0002");
    assert_eq!(Error::internal("oops").code(), "FOER0000");
}

#[test]
fn cardinality_codes() {
    assert_eq!(Error::cardinality(CardinalityCheck::ZeroOrOne, 2).code(), "FORG0003");
    assert_eq!(Error::cardinality(CardinalityCheck::OneOrMore, 0).code(), "FORG0004");
    assert_eq!(Error::cardinality(CardinalityCheck::ExactlyOne, 3).code(), "FORG0005");
}

#[test]
fn argument_mismatch_names_declared_type() {
    let err = Error::argument_mismatch(&ItemType::String.optional(), "xs:integer");
    match err.kind {
        ErrorKind::TypeMismatch { expected, actual } => {
            assert_eq!(expected, "xs:string?");
            assert_eq!(actual, "xs:integer");
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn frames_accumulate_innermost_first() {
    let err = Error::invalid_argument("bad")
        .in_function("fn:inner#1")
        .in_function("fn:outer#2");
    let context = err.context.unwrap();
    assert_eq!(context.innermost(), Some("fn:inner#1"));
    assert_eq!(context.stack.len(), 2);
}

#[test]
fn explicit_context() {
    let err = Error::internal("x").with_context(ErrorContext::new().with_frame("fn:f#0"));
    assert_eq!(err.context.unwrap().to_string(), "  in fn:f#0\n");
}

#[test]
fn display_includes_message() {
    let err = Error::unknown_function("fn:nope", 2);
    let message = err.to_string();
    assert!(message.contains("fn:nope"));
}
