//! Integration tests for higher-order functions, URI escaping and fn:error

use xqlib_foundation::{ErrorKind, Item, Sequence};
use xqlib_stdlib::{Context, Library};

use crate::{eval, s};

fn function(library: &Library, name: &str, arity: usize) -> Sequence {
    Sequence::one(library.function_item(name, arity).unwrap())
}

// =============================================================================
// Higher-order functions
// =============================================================================

#[test]
fn for_each_then_sort() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let words = Sequence::from(vec!["pear", "Fig", "apple"]);

    let upper = library
        .call(&mut ctx, "for-each", &[words.clone(), function(&library, "upper-case", 1)])
        .unwrap();
    let sorted = library.call(&mut ctx, "sort", &[upper]).unwrap();
    assert_eq!(sorted, Sequence::from(vec!["APPLE", "FIG", "PEAR"]));

    let by_length = library
        .call(
            &mut ctx,
            "sort",
            &[words, Sequence::empty(), function(&library, "string-length", 1)],
        )
        .unwrap();
    assert_eq!(by_length, Sequence::from(vec!["Fig", "pear", "apple"]));
}

#[test]
fn folds_with_named_functions() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let letters = Sequence::from(vec!["x", "y", "z"]);
    let concat = function(&library, "concat", 2);

    let left = library
        .call(&mut ctx, "fold-left", &[letters.clone(), Sequence::empty(), concat.clone()])
        .unwrap();
    assert_eq!(left, s("xyz"));

    let right = library
        .call(&mut ctx, "fold-right", &[letters.clone(), s("!"), concat])
        .unwrap();
    assert_eq!(right, s("xyz!"));

    let err = library
        .call(
            &mut ctx,
            "fold-left",
            &[letters, Sequence::empty(), function(&library, "insert-before", 3)],
        )
        .unwrap_err();
    assert_eq!(err.code(), "XPTY0004");
}

#[test]
fn deep_equal_and_unordered() {
    let seq = Sequence::from(vec![Item::Integer(1), Item::from("a")]);
    let unordered = eval("unordered", &[seq.clone()]).unwrap();
    assert_eq!(
        eval("deep-equal", &[seq, unordered]).unwrap(),
        Sequence::one(true)
    );
}

// =============================================================================
// URI escaping and normalization
// =============================================================================

#[test]
fn uri_functions() {
    assert_eq!(eval("encode-for-uri", &[s("a b/c")]).unwrap(), s("a%20b%2Fc"));
    assert_eq!(eval("iri-to-uri", &[s("a b/c")]).unwrap(), s("a%20b/c"));
    assert_eq!(eval("escape-html-uri", &[s("a b/\u{e9}")]).unwrap(), s("a b/%C3%A9"));
}

#[test]
fn normalize_unicode_default_is_nfc() {
    assert_eq!(eval("normalize-unicode", &[s("A\u{30a}")]).unwrap(), s("\u{c5}"));
}

// =============================================================================
// fn:error
// =============================================================================

#[test]
fn error_is_reported_with_frame() {
    let err = eval("error", &[s("err:FORG0001"), s("cannot cast")]).unwrap_err();
    assert_eq!(err.code(), "FORG0001");
    assert!(matches!(err.kind, ErrorKind::Raised { .. }));
    assert_eq!(err.context.unwrap().innermost(), Some("fn:error#2"));
}
