//! String functions that do not depend on a collation.

#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;
use xqlib_foundation::{Error, ErrorKind, Item, ItemType, Result, Sequence};

use super::{
    boolean_result, integer_from_usize, opt_string, required_double, required_string,
    round_half_up, string_or_empty, string_result,
};
use crate::context::Context;
use crate::registry::{Call, Library, NativeImpl};
use crate::signature::Signature;

pub(crate) fn register(library: &mut Library) {
    let str_opt = ItemType::String.optional();
    let str_one = ItemType::String.one();

    library.register(
        Signature::new("fn:concat", "Concatenates the string values of its arguments")
            .param("arg1", ItemType::AnyAtomic.optional())
            .param("arg2", ItemType::AnyAtomic.optional())
            .variadic()
            .returns(str_one),
        native_concat,
    );
    library.register(
        Signature::new("fn:string-join", "Concatenates a sequence of strings")
            .param("arg", ItemType::AnyAtomic.star())
            .returns(str_one),
        native_string_join,
    );
    library.register(
        Signature::new("fn:string-join", "Joins a sequence of strings with a separator")
            .param("arg", ItemType::AnyAtomic.star())
            .param("separator", str_one)
            .returns(str_one),
        native_string_join,
    );
    library.register(
        Signature::new("fn:string", "String value of an item")
            .param("arg", ItemType::Item.optional())
            .returns(str_one),
        native_string,
    );

    for (name, description, func) in [
        ("fn:upper-case", "Converts to upper case", native_upper_case as NativeImpl),
        ("fn:lower-case", "Converts to lower case", native_lower_case),
        ("fn:normalize-space", "Trims and collapses whitespace", native_normalize_space),
    ] {
        library.register(
            Signature::new(name, description).param("arg", str_opt).returns(str_one),
            func,
        );
    }

    library.register(
        Signature::new("fn:string-length", "Number of characters in a string")
            .param("arg", str_opt)
            .returns(ItemType::Integer.one()),
        native_string_length,
    );
    library.register(
        Signature::new("fn:substring", "Characters from a starting position")
            .param("source", str_opt)
            .param("start", ItemType::Double.one())
            .returns(str_one),
        native_substring,
    );
    library.register(
        Signature::new("fn:substring", "Characters from a starting position with a length")
            .param("source", str_opt)
            .param("start", ItemType::Double.one())
            .param("length", ItemType::Double.one())
            .returns(str_one),
        native_substring,
    );
    library.register(
        Signature::new("fn:translate", "Replaces or removes individual characters")
            .param("arg", str_opt)
            .param("map", str_one)
            .param("trans", str_one)
            .returns(str_one),
        native_translate,
    );
    library.register(
        Signature::new("fn:string-to-codepoints", "Codepoints of a string")
            .param("arg", str_opt)
            .returns(ItemType::Integer.star()),
        native_string_to_codepoints,
    );
    library.register(
        Signature::new("fn:codepoints-to-string", "String from a sequence of codepoints")
            .param("arg", ItemType::Integer.star())
            .returns(str_one),
        native_codepoints_to_string,
    );
    library.register(
        Signature::new("fn:normalize-unicode", "Normalizes a string to NFC")
            .param("arg", str_opt)
            .returns(str_one),
        native_normalize_unicode,
    );
    library.register(
        Signature::new("fn:normalize-unicode", "Normalizes a string to a named form")
            .param("arg", str_opt)
            .param("normalizationForm", str_one)
            .returns(str_one),
        native_normalize_unicode,
    );
    library.register(
        Signature::new("fn:codepoint-equal", "Compares two strings codepoint by codepoint")
            .param("comparand1", str_opt)
            .param("comparand2", str_opt)
            .returns(ItemType::Boolean.optional()),
        native_codepoint_equal,
    );
}

/// Returns true for a codepoint allowed in an XML 1.0 document.
fn is_xml_char(cp: u32) -> bool {
    matches!(cp, 0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF)
}

fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Collapses runs of XML whitespace to one space and trims both ends.
pub(crate) fn normalize_space(s: &str) -> String {
    s.split(is_xml_whitespace)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Native Function Implementations
// =============================================================================

/// fn:concat
pub(crate) fn native_concat(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let mut result = String::new();
    for arg in call.args {
        result.push_str(&string_or_empty(arg)?);
    }
    Ok(string_result(result))
}

/// fn:string-join
pub(crate) fn native_string_join(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let separator = match call.opt_arg(1) {
        Some(_) => required_string(call, 1)?,
        None => String::new(),
    };
    let parts = call
        .arg(0)?
        .iter()
        .map(Item::string_value)
        .collect::<Result<Vec<_>>>()?;
    Ok(string_result(parts.join(&separator)))
}

/// fn:string
pub(crate) fn native_string(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(string_result(string_or_empty(call.arg(0)?)?))
}

/// fn:upper-case
pub(crate) fn native_upper_case(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(string_result(string_or_empty(call.arg(0)?)?.to_uppercase()))
}

/// fn:lower-case
pub(crate) fn native_lower_case(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(string_result(string_or_empty(call.arg(0)?)?.to_lowercase()))
}

/// fn:normalize-space
pub(crate) fn native_normalize_space(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(string_result(normalize_space(&string_or_empty(call.arg(0)?)?)))
}

/// fn:string-length
pub(crate) fn native_string_length(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let length = string_or_empty(call.arg(0)?)?.chars().count();
    Ok(Sequence::one(integer_from_usize(length)?))
}

/// fn:substring
///
/// Keeps the characters at one-based positions `p` with
/// `round(start) <= p < round(start) + round(length)`. NaN and infinite
/// arguments fall out of the comparisons naturally.
pub(crate) fn native_substring(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let source = string_or_empty(call.arg(0)?)?;
    let start = round_half_up(required_double(call, 1)?);
    let end = if call.args.len() > 2 {
        start + round_half_up(required_double(call, 2)?)
    } else {
        f64::INFINITY
    };

    let result: String = source
        .chars()
        .enumerate()
        .filter(|(i, _)| {
            let position = (i + 1) as f64;
            position >= start && position < end
        })
        .map(|(_, c)| c)
        .collect();
    Ok(string_result(result))
}

/// fn:translate
pub(crate) fn native_translate(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let source = string_or_empty(call.arg(0)?)?;
    let map = required_string(call, 1)?;
    let trans: Vec<char> = required_string(call, 2)?.chars().collect();

    // The first occurrence of a character in the map wins
    let mut table: HashMap<char, Option<char>> = HashMap::new();
    for (i, c) in map.chars().enumerate() {
        table.entry(c).or_insert_with(|| trans.get(i).copied());
    }

    let result: String = source
        .chars()
        .filter_map(|c| table.get(&c).copied().unwrap_or(Some(c)))
        .collect();
    Ok(string_result(result))
}

/// fn:string-to-codepoints
pub(crate) fn native_string_to_codepoints(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let source = string_or_empty(call.arg(0)?)?;
    Ok(source.chars().map(|c| Item::Integer(i64::from(u32::from(c)))).collect())
}

/// fn:codepoints-to-string
pub(crate) fn native_codepoints_to_string(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let mut result = String::new();
    for item in call.arg(0)? {
        let n = item
            .as_int()
            .ok_or_else(|| Error::type_mismatch("xs:integer", item.item_type().to_string()))?;
        let c = u32::try_from(n)
            .ok()
            .filter(|&cp| is_xml_char(cp))
            .and_then(char::from_u32)
            .ok_or_else(|| Error::new(ErrorKind::InvalidCodepoint(u32::try_from(n).unwrap_or(u32::MAX))))?;
        result.push(c);
    }
    Ok(string_result(result))
}

/// fn:codepoint-equal
pub(crate) fn native_codepoint_equal(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    match (opt_string(call.arg(0)?)?, opt_string(call.arg(1)?)?) {
        (Some(a), Some(b)) => Ok(boolean_result(a == b)),
        _ => Ok(Sequence::empty()),
    }
}

/// fn:normalize-unicode
///
/// The form name is trimmed and upper-cased first; an empty form leaves the
/// input as it is.
pub(crate) fn native_normalize_unicode(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let input = string_or_empty(call.arg(0)?)?;
    let form = match call.opt_arg(1) {
        Some(_) => required_string(call, 1)?.trim().to_ascii_uppercase(),
        None => "NFC".to_string(),
    };
    let normalized: String = match form.as_str() {
        "" => input,
        "NFC" => input.nfc().collect(),
        "NFD" => input.nfd().collect(),
        "NFKC" => input.nfkc().collect(),
        "NFKD" => input.nfkd().collect(),
        _ => return Err(Error::new(ErrorKind::UnsupportedNormalization(form))),
    };
    Ok(string_result(normalized))
}
