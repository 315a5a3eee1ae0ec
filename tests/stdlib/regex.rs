//! Integration tests for regular expression functions and the pattern cache

use xqlib_foundation::Sequence;
use xqlib_stdlib::{PatternCache, RegexFlags, Replacement};

use crate::{eval, s};

#[test]
fn whitespace_flag_ignores_pattern_spaces() {
    let result = eval("matches", &[s("helloworld"), s("hello world"), s("x")]).unwrap();
    assert_eq!(result, Sequence::one(true));
    let class = eval("matches", &[s("a b"), s("a[ ]b"), s("x")]).unwrap();
    assert_eq!(class, Sequence::one(true));
}

#[test]
fn dot_all_flag() {
    let input = s("one\ntwo");
    assert_eq!(
        eval("matches", &[input.clone(), s("one.two")]).unwrap(),
        Sequence::one(false)
    );
    assert_eq!(
        eval("matches", &[input, s("one.two"), s("s")]).unwrap(),
        Sequence::one(true)
    );
}

#[test]
fn replace_with_escaped_dollar() {
    let result = eval("replace", &[s("cost: 5"), s("(\\d+)"), s("\\$$1")]).unwrap();
    assert_eq!(result, s("cost: $5"));
}

#[test]
fn replace_group_number_stops_at_group_count() {
    // $12 with one group reads as group 1 followed by a literal 2
    let result = eval("replace", &[s("abc"), s("(b)"), s("[$12]")]).unwrap();
    assert_eq!(result, s("a[b2]c"));
}

#[test]
fn tokenize_then_join() {
    let tokens = eval("tokenize", &[s("a,b,,c"), s(",")]).unwrap();
    assert_eq!(tokens, Sequence::from(vec!["a", "b", "", "c"]));
    let joined = eval("string-join", &[tokens, s("|")]).unwrap();
    assert_eq!(joined, s("a|b||c"));
}

#[test]
fn cache_evicts_least_recently_used() {
    let mut cache = PatternCache::new(2);
    let flags = RegexFlags::default();
    cache.get_or_compile("a", flags).unwrap();
    cache.get_or_compile("b", flags).unwrap();
    cache.get_or_compile("a", flags).unwrap();
    cache.get_or_compile("c", flags).unwrap();
    assert_eq!(cache.len(), 2);

    let insensitive = RegexFlags::parse("i").unwrap();
    let regex = cache.get_or_compile("a", insensitive).unwrap();
    assert!(regex.is_match("A"));
}

#[test]
fn replacement_parse_errors() {
    assert!(Replacement::parse("$", 1, false).is_err());
    assert!(Replacement::parse("\\n", 1, false).is_err());
    assert!(Replacement::parse("$", 1, true).is_ok());
}
