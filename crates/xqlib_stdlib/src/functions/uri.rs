//! URI escaping: `fn:encode-for-uri`, `fn:iri-to-uri`, `fn:escape-html-uri`.
//!
//! All three percent-encode the UTF-8 bytes of the characters they escape,
//! with upper-case hex digits. They differ only in which ASCII characters
//! pass through; non-ASCII characters are always escaped.

#![allow(clippy::unnecessary_wraps)]

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};
use xqlib_foundation::{ItemType, Result, Sequence};

use super::{string_or_empty, string_result};
use crate::context::Context;
use crate::registry::{Call, Library, NativeImpl};
use crate::signature::Signature;

/// Everything except the RFC 3986 unreserved characters.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Characters that may not appear in a URI but may appear in an IRI.
const IRI_EXCLUDED: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub(crate) fn register(library: &mut Library) {
    for (name, description, func) in [
        ("fn:encode-for-uri", "Escapes reserved characters for a URI path segment", native_encode_for_uri as NativeImpl),
        ("fn:iri-to-uri", "Converts an IRI to a URI", native_iri_to_uri),
        ("fn:escape-html-uri", "Escapes non-printable-ASCII characters", native_escape_html_uri),
    ] {
        library.register(
            Signature::new(name, description)
                .param("uri-part", ItemType::String.optional())
                .returns(ItemType::String.one()),
            func,
        );
    }
}

fn escape(call: &Call<'_>, set: &'static AsciiSet) -> Result<Sequence> {
    let input = string_or_empty(call.arg(0)?)?;
    Ok(string_result(utf8_percent_encode(&input, set).to_string()))
}

// =============================================================================
// Native Function Implementations
// =============================================================================

/// fn:encode-for-uri
pub(crate) fn native_encode_for_uri(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    escape(call, URI_COMPONENT)
}

/// fn:iri-to-uri
pub(crate) fn native_iri_to_uri(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    escape(call, IRI_EXCLUDED)
}

/// fn:escape-html-uri
pub(crate) fn native_escape_html_uri(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    escape(call, CONTROLS)
}
