//! Integration tests for numeric and math functions

use xqlib_foundation::{Item, Sequence};

use crate::{eval, s};

fn double(seq: &Sequence) -> f64 {
    seq.as_single().and_then(Item::as_double).unwrap()
}

#[test]
fn integers_stay_integers() {
    let seq = Sequence::from(vec![3, -7, 12]);
    assert_eq!(eval("sum", &[seq.clone()]).unwrap(), Sequence::one(8));
    assert_eq!(eval("min", &[seq.clone()]).unwrap(), Sequence::one(-7));
    assert_eq!(eval("abs", &[Sequence::one(-7)]).unwrap(), Sequence::one(7));
    assert_eq!(eval("round", &[Sequence::one(12)]).unwrap(), Sequence::one(12));
}

#[test]
fn sum_with_zero_value() {
    let result = eval("sum", &[Sequence::empty(), Sequence::empty()]).unwrap();
    assert!(result.is_empty());
    let result = eval("sum", &[Sequence::empty(), Sequence::one(0.0)]).unwrap();
    assert_eq!(result, Sequence::one(0.0));
}

#[test]
fn aggregates_promote_to_double() {
    let seq = Sequence::from(vec![Item::Integer(1), Item::Double(2.5)]);
    assert_eq!(double(&eval("sum", &[seq.clone()]).unwrap()), 3.5);
    assert_eq!(double(&eval("avg", &[seq]).unwrap()), 1.75);
}

#[test]
fn rounding_family_on_negative_halves() {
    assert_eq!(double(&eval("round", &[Sequence::one(-0.5)]).unwrap()), -0.0);
    assert_eq!(double(&eval("round-half-to-even", &[Sequence::one(-1.5)]).unwrap()), -2.0);
    assert_eq!(double(&eval("floor", &[Sequence::one(-0.5)]).unwrap()), -1.0);
    assert_eq!(double(&eval("ceiling", &[Sequence::one(-1.5)]).unwrap()), -1.0);
}

#[test]
fn number_converts_lexical_forms() {
    assert_eq!(double(&eval("number", &[s("1e3")]).unwrap()), 1000.0);
    assert_eq!(double(&eval("number", &[s("-INF")]).unwrap()), f64::NEG_INFINITY);
    assert!(double(&eval("number", &[s("twelve")]).unwrap()).is_nan());
}

#[test]
fn math_composes_with_numbers() {
    let root = eval("math:sqrt", &[Sequence::one(2)]).unwrap();
    let squared = eval("math:pow", &[root, Sequence::one(2)]).unwrap();
    assert!((double(&squared) - 2.0).abs() < 1e-12);

    let log = eval("math:log", &[eval("math:exp", &[Sequence::one(1)]).unwrap()]).unwrap();
    assert!((double(&log) - 1.0).abs() < 1e-12);
}

#[test]
fn strings_are_not_numbers() {
    assert_eq!(eval("abs", &[s("1")]).unwrap_err().code(), "XPTY0004");
    assert_eq!(eval("sum", &[Sequence::from(vec!["a", "b"])]).unwrap_err().code(), "FORG0006");
}
