//! Integration tests for string functions

use xqlib_foundation::{Item, Sequence};

use crate::{eval, s};

fn text(seq: &Sequence) -> &str {
    seq.as_single().and_then(Item::as_str).unwrap()
}

#[test]
fn supplementary_characters_count_once() {
    let clef = "\u{1D11E}";
    assert_eq!(eval("string-length", &[s(clef)]).unwrap(), Sequence::one(1));
    let sub = eval("substring", &[s("a\u{1D11E}b"), Sequence::one(2), Sequence::one(1)]).unwrap();
    assert_eq!(text(&sub), clef);
    assert_eq!(
        eval("string-to-codepoints", &[s(clef)]).unwrap(),
        Sequence::one(0x1D11E)
    );
}

#[test]
fn join_of_numbers_uses_canonical_forms() {
    let values = Sequence::from(vec![Item::Integer(1), Item::Double(2.5), Item::Double(1e7)]);
    let joined = eval("string-join", &[values, s(", ")]).unwrap();
    assert_eq!(text(&joined), "1, 2.5, 1.0E7");
}

#[test]
fn concat_accepts_many_arguments() {
    let args: Vec<Sequence> = ["a", "b", "c", "d", "e"].into_iter().map(s).collect();
    assert_eq!(text(&eval("concat", &args).unwrap()), "abcde");
}

#[test]
fn case_mapping_is_unicode_aware() {
    let upper = eval("upper-case", &[s("stra\u{df}e")]).unwrap();
    assert_eq!(text(&upper), "STRASSE");
    let lower = eval("lower-case", &[s("\u{c9}COLE")]).unwrap();
    assert_eq!(text(&lower), "\u{e9}cole");
}

#[test]
fn codepoint_round_trip_through_library() {
    let codepoints = eval("string-to-codepoints", &[s("h\u{e9}llo")]).unwrap();
    let back = eval("codepoints-to-string", &[codepoints]).unwrap();
    assert_eq!(text(&back), "h\u{e9}llo");
}

#[test]
fn translate_removes_unmapped() {
    let result = eval("translate", &[s("2024-10-16"), s("-"), s("")]).unwrap();
    assert_eq!(text(&result), "20241016");
}
