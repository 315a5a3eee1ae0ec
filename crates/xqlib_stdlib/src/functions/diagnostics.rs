//! `fn:error`.

use xqlib_foundation::{Error, ItemType, Result, Sequence};

use super::{opt_string, required_string};
use crate::context::Context;
use crate::registry::{Call, Library};
use crate::signature::Signature;

/// Code raised when the caller gives none.
const DEFAULT_CODE: &str = "FOER0000";

pub(crate) fn register(library: &mut Library) {
    library.register(Signature::new("fn:error", "Raises an unspecified error"), native_error);
    library.register(
        Signature::new("fn:error", "Raises an error with a code")
            .param("code", ItemType::AnyAtomic.optional()),
        native_error,
    );
    library.register(
        Signature::new("fn:error", "Raises an error with a code and description")
            .param("code", ItemType::AnyAtomic.optional())
            .param("description", ItemType::String.one()),
        native_error,
    );
    library.register(
        Signature::new("fn:error", "Raises an error with a code, description and value")
            .param("code", ItemType::AnyAtomic.optional())
            .param("description", ItemType::String.one())
            .param("error-object", ItemType::Item.star()),
        native_error,
    );
}

/// Local part of a lexical error code: `err:FOER0000`, `Q{ns}local` and
/// plain `local` all name their local part.
fn local_code(lexical: &str) -> &str {
    match lexical.strip_prefix("Q{") {
        Some(rest) => rest.split_once('}').map_or(rest, |(_, local)| local),
        None => lexical.rsplit_once(':').map_or(lexical, |(_, local)| local),
    }
}

/// fn:error
///
/// Never returns normally.
pub(crate) fn native_error(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let code = match call.opt_arg(0) {
        Some(arg) => opt_string(arg)?,
        None => None,
    };
    let code = code.as_deref().map_or(DEFAULT_CODE, local_code);
    let description = match call.opt_arg(1) {
        Some(_) => required_string(call, 1)?,
        None => "unspecified error".to_string(),
    };
    let value = call.opt_arg(2).cloned().unwrap_or_default();
    Err(Error::raised(code, description, value))
}
