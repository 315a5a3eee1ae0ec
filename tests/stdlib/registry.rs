//! Integration tests for function lookup, function items, and dispatch

use xqlib_foundation::{ErrorKind, Item, Sequence, XqMap};
use xqlib_stdlib::{Context, Library};

use crate::{eval, s};

// =============================================================================
// Name Resolution
// =============================================================================

#[test]
fn lexical_forms_resolve_to_same_function() {
    let library = Library::standard();
    for name in [
        "abs",
        "fn:abs",
        "Q{http://www.w3.org/2005/xpath-functions}abs",
    ] {
        assert!(library.contains(name, 1), "{name} should resolve");
    }
    assert!(library.contains("Q{http://www.w3.org/2005/xpath-functions/math}pi", 0));
    assert!(!library.contains("math:abs", 1));
    assert!(!library.contains("xs:abs", 1));
}

#[test]
fn unknown_arity_is_static_error() {
    let err = eval("fn:abs", &[]).unwrap_err();
    assert_eq!(err.code(), "XPST0017");
    assert!(matches!(err.kind, ErrorKind::UnknownFunction { arity: 0, .. }));
}

#[test]
fn every_public_signature_is_callable_by_name() {
    let library = Library::standard();
    let signatures = library.signatures();
    assert!(signatures.len() > 60);
    for sig in signatures {
        assert!(library.contains(sig.name, sig.arity()), "{sig}");
    }
}

#[test]
fn signatures_are_sorted() {
    let library = Library::standard();
    let names: Vec<(&str, usize)> = library
        .signatures()
        .iter()
        .map(|sig| (sig.name, sig.arity()))
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

// =============================================================================
// Argument Checking
// =============================================================================

#[test]
fn wrong_type_is_rejected_before_call() {
    let err = eval("upper-case", &[Sequence::one(12)]).unwrap_err();
    assert_eq!(err.code(), "XPTY0004");
    let context = err.context.unwrap();
    assert_eq!(context.innermost(), Some("fn:upper-case#1"));
}

#[test]
fn wrong_cardinality_is_type_error() {
    let err = eval("string-length", &[Sequence::from(vec!["a", "b"])]).unwrap_err();
    assert_eq!(err.code(), "XPTY0004");
}

#[test]
fn runtime_errors_carry_frame() {
    let err = eval("exactly-one", &[Sequence::empty()]).unwrap_err();
    assert_eq!(err.code(), "FORG0005");
    assert_eq!(err.context.unwrap().innermost(), Some("fn:exactly-one#1"));
}

// =============================================================================
// Function Items
// =============================================================================

#[test]
fn named_function_reference() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let abs = library.function_item("abs", 1).unwrap();
    let result = library.invoke(&mut ctx, &abs, &[Sequence::one(-3)]).unwrap();
    assert_eq!(result, Sequence::one(3));

    let err = library.function_item("abs", 3).unwrap_err();
    assert_eq!(err.code(), "XPST0017");
}

#[test]
fn function_item_arity_is_enforced() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let abs = library.function_item("abs", 1).unwrap();
    let err = library.invoke(&mut ctx, &abs, &[]).unwrap_err();
    assert_eq!(err.code(), "XPTY0004");
}

#[test]
fn maps_are_invocable() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let map = Item::Map(XqMap::new().insert("k", Item::Integer(42)));
    assert_eq!(library.invoke(&mut ctx, &map, &[s("k")]).unwrap(), Sequence::one(42));
    assert!(library.invoke(&mut ctx, &map, &[s("missing")]).unwrap().is_empty());
}

#[test]
fn atomic_items_are_not_invocable() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let err = library.invoke(&mut ctx, &Item::Integer(1), &[]).unwrap_err();
    assert_eq!(err.code(), "XPTY0004");
}
