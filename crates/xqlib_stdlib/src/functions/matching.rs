//! Regular expression functions: `fn:matches`, `fn:replace`, `fn:tokenize`.

#![allow(clippy::unnecessary_wraps)]

use regex::Captures;
use xqlib_foundation::{Item, ItemType, Result, Sequence};

use super::string::normalize_space;
use super::{boolean_result, required_string, string_or_empty, string_result};
use crate::context::Context;
use crate::pattern::{Replacement, reject_empty_match};
use crate::registry::{Call, Library};
use crate::signature::Signature;

pub(crate) fn register(library: &mut Library) {
    let str_opt = ItemType::String.optional();
    let str_one = ItemType::String.one();

    library.register(
        Signature::new("fn:matches", "Whether a string matches a pattern")
            .param("input", str_opt)
            .param("pattern", str_one)
            .returns(ItemType::Boolean.one()),
        native_matches,
    );
    library.register(
        Signature::new("fn:matches", "Whether a string matches a pattern under flags")
            .param("input", str_opt)
            .param("pattern", str_one)
            .param("flags", str_one)
            .returns(ItemType::Boolean.one()),
        native_matches,
    );
    library.register(
        Signature::new("fn:replace", "Replaces every match of a pattern")
            .param("input", str_opt)
            .param("pattern", str_one)
            .param("replacement", str_one)
            .returns(str_one),
        native_replace,
    );
    library.register(
        Signature::new("fn:replace", "Replaces every match of a pattern under flags")
            .param("input", str_opt)
            .param("pattern", str_one)
            .param("replacement", str_one)
            .param("flags", str_one)
            .returns(str_one),
        native_replace,
    );
    library.register(
        Signature::new("fn:tokenize", "Splits a string on whitespace")
            .param("input", str_opt)
            .returns(ItemType::String.star()),
        native_tokenize,
    );
    library.register(
        Signature::new("fn:tokenize", "Splits a string on a pattern")
            .param("input", str_opt)
            .param("pattern", str_one)
            .returns(ItemType::String.star()),
        native_tokenize,
    );
    library.register(
        Signature::new("fn:tokenize", "Splits a string on a pattern under flags")
            .param("input", str_opt)
            .param("pattern", str_one)
            .param("flags", str_one)
            .returns(ItemType::String.star()),
        native_tokenize,
    );
}

/// The flags argument at `index`, or "" when absent.
fn flags_arg(call: &Call<'_>, index: usize) -> Result<String> {
    match call.opt_arg(index) {
        Some(_) => required_string(call, index),
        None => Ok(String::new()),
    }
}

/// fn:matches
pub(crate) fn native_matches(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let input = string_or_empty(call.arg(0)?)?;
    let pattern = required_string(call, 1)?;
    let (regex, _) = ctx.regex(&pattern, &flags_arg(call, 2)?)?;
    Ok(boolean_result(regex.is_match(&input)))
}

/// fn:replace
pub(crate) fn native_replace(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let input = string_or_empty(call.arg(0)?)?;
    let pattern = required_string(call, 1)?;
    let replacement = required_string(call, 2)?;
    let (regex, flags) = ctx.regex(&pattern, &flags_arg(call, 3)?)?;
    reject_empty_match(&regex, &pattern)?;

    let replacement = Replacement::parse(&replacement, regex.captures_len() - 1, flags.literal)?;
    let result = regex.replace_all(&input, |caps: &Captures<'_>| {
        let mut expanded = String::new();
        replacement.expand(caps, &mut expanded);
        expanded
    });
    Ok(string_result(result.into_owned()))
}

/// fn:tokenize
///
/// With one argument, splits the whitespace-normalized input on single
/// spaces. An empty input gives the empty sequence; otherwise leading and
/// trailing empty tokens are kept.
pub(crate) fn native_tokenize(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let input = string_or_empty(call.arg(0)?)?;

    if call.args.len() == 1 {
        let normalized = normalize_space(&input);
        return Ok(normalized
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(Item::from)
            .collect());
    }

    let pattern = required_string(call, 1)?;
    let (regex, _) = ctx.regex(&pattern, &flags_arg(call, 2)?)?;
    reject_empty_match(&regex, &pattern)?;

    if input.is_empty() {
        return Ok(Sequence::empty());
    }
    Ok(regex.split(&input).map(Item::from).collect())
}
