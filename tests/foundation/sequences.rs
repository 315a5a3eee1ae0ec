//! Integration tests for persistent sequences and maps
//!
//! Sequences and maps share structure; every modification returns a new value.

use xqlib_foundation::{Item, Sequence, XqMap};

// =============================================================================
// Sequence
// =============================================================================

#[test]
fn empty_sequence() {
    let seq = Sequence::empty();
    assert!(seq.is_empty());
    assert_eq!(seq.first(), None);
    assert_eq!(seq, Sequence::default());
}

#[test]
fn push_back_leaves_original() {
    let a = Sequence::one(1);
    let b = a.push_back(2);
    assert_eq!(a.len(), 1);
    assert_eq!(b, Sequence::from(vec![1, 2]));
}

#[test]
fn slice_and_concat() {
    let seq: Sequence = (1..=5).map(Item::Integer).collect();
    let front = seq.slice(0, 2);
    let back = seq.slice(2, 5);
    assert_eq!(front.concat(&back), seq);
    assert_eq!(seq.slice(3, 100).len(), 2);
    assert!(seq.slice(4, 2).is_empty());
}

#[test]
fn as_single_only_for_singletons() {
    assert_eq!(Sequence::one("x").as_single(), Some(&Item::from("x")));
    assert_eq!(Sequence::from(vec![1, 2]).as_single(), None);
    assert_eq!(Sequence::empty().as_single(), None);
}

#[test]
fn reverse_and_last() {
    let seq = Sequence::from(vec!["a", "b", "c"]);
    assert_eq!(seq.last(), Some(&Item::from("c")));
    assert_eq!(seq.reverse().first(), Some(&Item::from("c")));
}

#[test]
fn large_sequence_clone_is_shared() {
    let seq: Sequence = (0..10_000).map(Item::Integer).collect();
    let copy = seq.clone();
    let grown = copy.push_back(-1);
    assert_eq!(seq.len(), 10_000);
    assert_eq!(grown.len(), 10_001);
}

// =============================================================================
// XqMap
// =============================================================================

#[test]
fn map_insert_and_lookup() {
    let map = XqMap::new()
        .insert("number", Item::Double(0.5))
        .insert("count", Item::Integer(3));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_str("number"), Some(&Sequence::one(0.5)));
    assert_eq!(map.get(&Item::from("count")), Some(&Sequence::one(3)));
    assert_eq!(map.get_str("missing"), None);
}

#[test]
fn map_insert_replaces() {
    let a = XqMap::new().insert("k", Item::Integer(1));
    let b = a.insert("k", Item::Integer(2));
    assert_eq!(a.get_str("k"), Some(&Sequence::one(1)));
    assert_eq!(b.get_str("k"), Some(&Sequence::one(2)));
    assert_eq!(b.len(), 1);
}

#[test]
fn equal_maps_hash_equal() {
    use std::collections::HashSet;

    let entries = [("x", 1), ("y", 2), ("z", 3)];
    let a = entries
        .iter()
        .fold(XqMap::new(), |m, &(k, v)| m.insert(k, Item::Integer(v)));
    let b = entries
        .iter()
        .rev()
        .fold(XqMap::new(), |m, &(k, v)| m.insert(k, Item::Integer(v)));
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(Item::Map(a));
    assert!(set.contains(&Item::Map(b)));
}
