//! Integration tests for Item values and sequence types

use xqlib_foundation::{FunctionItem, HandleId, Item, ItemType, Sequence, XqMap, format_double};

// =============================================================================
// String Values
// =============================================================================

#[test]
fn string_value_of_atomics() {
    assert_eq!(Item::Boolean(true).string_value().unwrap(), "true");
    assert_eq!(Item::Integer(-12).string_value().unwrap(), "-12");
    assert_eq!(Item::from("text").string_value().unwrap(), "text");
    assert_eq!(Item::Double(1.5).string_value().unwrap(), "1.5");
}

#[test]
fn string_value_of_map_fails() {
    let err = Item::Map(XqMap::new()).string_value().unwrap_err();
    assert_eq!(err.code(), "XPTY0004");
}

#[test]
fn double_canonical_forms() {
    assert_eq!(format_double(2.0), "2");
    assert_eq!(format_double(-0.0), "-0");
    assert_eq!(format_double(f64::NAN), "NaN");
    assert_eq!(format_double(f64::NEG_INFINITY), "-INF");
    assert_eq!(format_double(1e20), "1.0E20");
    assert_eq!(format_double(0.5), "0.5");
}

// =============================================================================
// Equality and Accessors
// =============================================================================

#[test]
fn nan_items_are_equal_to_themselves() {
    assert_eq!(Item::Double(f64::NAN), Item::Double(f64::NAN));
}

#[test]
fn integer_and_double_are_distinct_items() {
    assert_ne!(Item::Integer(1), Item::Double(1.0));
    assert_eq!(Item::Integer(1).as_number(), Some(1.0));
}

#[test]
fn accessors_match_variant() {
    assert_eq!(Item::Integer(3).as_int(), Some(3));
    assert_eq!(Item::Integer(3).as_double(), None);
    assert_eq!(Item::from("x").as_str(), Some("x"));
    assert!(Item::Boolean(false).is_atomic());
    assert!(!Item::Map(XqMap::new()).is_atomic());
}

#[test]
fn bound_function_items_differ_by_handle() {
    let a = FunctionItem::bound("fn:f", 0, HandleId::new(0, 1));
    let b = FunctionItem::bound("fn:f", 0, HandleId::new(1, 1));
    assert_ne!(a, b);
    assert_eq!(a.to_string(), "fn:f#0");
    assert_eq!(FunctionItem::named("fn:f", 0).captured, None);
}

// =============================================================================
// Sequence Types
// =============================================================================

#[test]
fn double_accepts_integer_promotion() {
    assert!(ItemType::Double.one().accepts(&Sequence::one(1)));
    assert!(!ItemType::Integer.one().accepts(&Sequence::one(1.0)));
}

#[test]
fn occurrence_indicators() {
    let two = Sequence::from(vec![1, 2]);
    assert!(ItemType::Integer.star().accepts(&two));
    assert!(ItemType::Integer.plus().accepts(&two));
    assert!(!ItemType::Integer.optional().accepts(&two));
    assert!(ItemType::Integer.optional().accepts(&Sequence::empty()));
    assert!(!ItemType::Integer.plus().accepts(&Sequence::empty()));
}

#[test]
fn any_atomic_rejects_maps() {
    let map = Sequence::one(Item::Map(XqMap::new()));
    assert!(!ItemType::AnyAtomic.one().accepts(&map));
    assert!(ItemType::Map.one().accepts(&map));
    assert!(ItemType::Item.one().accepts(&map));
}

#[test]
fn sequence_type_display() {
    assert_eq!(ItemType::String.optional().to_string(), "xs:string?");
    assert_eq!(ItemType::Item.star().to_string(), "item()*");
}
