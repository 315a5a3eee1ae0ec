//! Integration tests for generational handles

use xqlib_foundation::{ErrorKind, HandleArena};

#[test]
fn insert_and_get() {
    let mut arena = HandleArena::new();
    let a = arena.insert("first");
    let b = arena.insert("second");
    assert_ne!(a, b);
    assert_eq!(*arena.get(a).unwrap(), "first");
    assert_eq!(arena.len(), 2);
}

#[test]
fn get_mut_modifies_in_place() {
    let mut arena = HandleArena::new();
    let h = arena.insert(1);
    *arena.get_mut(h).unwrap() += 41;
    assert_eq!(*arena.get(h).unwrap(), 42);
}

#[test]
fn removed_handle_is_stale() {
    let mut arena = HandleArena::new();
    let h = arena.insert(7);
    assert_eq!(arena.remove(h).unwrap(), 7);
    assert!(!arena.is_valid(h));
    assert!(arena.is_empty());

    let err = arena.get(h).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaleHandle(id) if id == h));
    assert_eq!(err.code(), "FOER0000");
}

#[test]
fn reused_slot_rejects_old_handle() {
    let mut arena = HandleArena::new();
    let old = arena.insert("old");
    arena.remove(old).unwrap();
    let new = arena.insert("new");

    assert_eq!(old.index, new.index);
    assert_ne!(old.generation, new.generation);
    assert!(arena.get(old).is_err());
    assert_eq!(*arena.get(new).unwrap(), "new");
    assert!(arena.remove(old).is_err());
}
