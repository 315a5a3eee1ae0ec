//! Integration tests for collation resolution and collation-aware functions

use std::borrow::Cow;
use std::sync::Arc;

use xqlib_foundation::Sequence;
use xqlib_stdlib::{
    CASEBLIND_COLLATION_URI, CODEPOINT_COLLATION_URI, Collations, Collator, Context,
    HTML_ASCII_CASE_INSENSITIVE_COLLATION_URI, Library, LibraryConfig, UCA_COLLATION_URI,
};

use crate::s;

/// Compares strings with hyphens ignored.
#[derive(Debug)]
struct IgnoreHyphens;

impl Collator for IgnoreHyphens {
    fn uri(&self) -> &str {
        "urn:test:ignore-hyphens"
    }

    fn key<'a>(&self, s: &'a str) -> Cow<'a, str> {
        Cow::Owned(s.replace('-', ""))
    }
}

#[test]
fn default_collation_from_config() {
    let library = Library::standard();
    let config = LibraryConfig::default().with_default_collation(CASEBLIND_COLLATION_URI);
    let mut ctx = Context::new(config).unwrap();

    assert_eq!(
        library.call(&mut ctx, "default-collation", &[]).unwrap(),
        s(CASEBLIND_COLLATION_URI)
    );
    assert_eq!(
        library.call(&mut ctx, "compare", &[s("ABC"), s("abc")]).unwrap(),
        Sequence::one(0)
    );
    let explicit = [s("ABC"), s("abc"), s(CODEPOINT_COLLATION_URI)];
    assert_eq!(library.call(&mut ctx, "compare", &explicit).unwrap(), Sequence::one(-1));
}

#[test]
fn unknown_default_collation_fails_context() {
    let config = LibraryConfig::default().with_default_collation("urn:nowhere");
    let err = Context::new(config).unwrap_err();
    assert_eq!(err.code(), "FOCH0002");
}

#[test]
fn uca_falls_back_unless_strict() {
    let library = Library::standard();
    let uri = format!("{UCA_COLLATION_URI}?lang=en");
    let args = [s("a"), s("b"), s(&uri)];

    let mut lenient = Context::default();
    assert_eq!(library.call(&mut lenient, "compare", &args).unwrap(), Sequence::one(-1));

    let mut strict = Context::new(LibraryConfig::strict()).unwrap();
    let err = library.call(&mut strict, "compare", &args).unwrap_err();
    assert_eq!(err.code(), "FOCH0002");

    let no_fallback = format!("{UCA_COLLATION_URI}?fallback=no");
    let err = library
        .call(&mut lenient, "compare", &[s("a"), s("b"), s(&no_fallback)])
        .unwrap_err();
    assert_eq!(err.code(), "FOCH0002");
}

#[test]
fn query_parameters_ignored_for_known_collations() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let uri = format!("{HTML_ASCII_CASE_INSENSITIVE_COLLATION_URI}?strength=primary");
    let result = library
        .call(&mut ctx, "starts-with", &[s("Hello"), s("HE"), s(&uri)])
        .unwrap();
    assert_eq!(result, Sequence::one(true));
}

#[test]
fn custom_collator_registration() {
    let library = Library::standard();
    let mut collations = Collations::default();
    collations.register(Arc::new(IgnoreHyphens));
    let config = LibraryConfig::default().with_default_collation("urn:test:ignore-hyphens");
    let mut ctx = Context::with_collations(config, collations).unwrap();

    assert_eq!(
        library.call(&mut ctx, "compare", &[s("co-op"), s("coop")]).unwrap(),
        Sequence::one(0)
    );
    let words = Sequence::from(vec!["e-mail", "email", "mail"]);
    let distinct = library.call(&mut ctx, "distinct-values", &[words]).unwrap();
    assert_eq!(distinct, Sequence::from(vec!["e-mail", "mail"]));
}
