//! Integration tests for sequence and boolean functions

use xqlib_foundation::{Item, Sequence, XqMap};
use xqlib_stdlib::effective_boolean_value;

use crate::{eval, s};

#[test]
fn subsequence_matches_head_and_tail() {
    let seq = Sequence::from(vec!["a", "b", "c", "d"]);
    let head = eval("head", &[seq.clone()]).unwrap();
    let first = eval("subsequence", &[seq.clone(), Sequence::one(1), Sequence::one(1)]).unwrap();
    assert_eq!(head, first);

    let tail = eval("tail", &[seq.clone()]).unwrap();
    let rest = eval("subsequence", &[seq, Sequence::one(2)]).unwrap();
    assert_eq!(tail, rest);
}

#[test]
fn insert_then_remove_restores() {
    let seq = Sequence::from(vec![1, 2, 3]);
    let inserted = eval("insert-before", &[seq.clone(), Sequence::one(2), Sequence::one(99)]).unwrap();
    assert_eq!(inserted, Sequence::from(vec![1, 99, 2, 3]));
    let removed = eval("remove", &[inserted, Sequence::one(2)]).unwrap();
    assert_eq!(removed, seq);
}

#[test]
fn cardinality_functions_pass_through() {
    let one = Sequence::one(Item::Map(XqMap::new()));
    assert_eq!(eval("exactly-one", &[one.clone()]).unwrap(), one);
    assert_eq!(eval("zero-or-one", &[one.clone()]).unwrap(), one);
    assert_eq!(eval("one-or-more", &[one.clone()]).unwrap(), one);
}

#[test]
fn index_of_feeds_remove() {
    let seq = Sequence::from(vec!["x", "y", "z"]);
    let position = eval("index-of", &[seq.clone(), s("y")]).unwrap();
    let removed = eval("remove", &[seq, position]).unwrap();
    assert_eq!(removed, Sequence::from(vec!["x", "z"]));
}

#[test]
fn distinct_then_count() {
    let seq = Sequence::from(vec![1, 2, 2, 3, 3, 3]);
    let distinct = eval("distinct-values", &[seq]).unwrap();
    assert_eq!(eval("count", &[distinct]).unwrap(), Sequence::one(3));
}

#[test]
fn effective_boolean_value_matches_fn_boolean() {
    for seq in [
        Sequence::empty(),
        Sequence::one(0),
        Sequence::one(f64::NAN),
        s(""),
        s("0"),
        Sequence::one(true),
    ] {
        let direct = effective_boolean_value(&seq).unwrap();
        assert_eq!(eval("boolean", &[seq]).unwrap(), Sequence::one(direct));
    }
}
