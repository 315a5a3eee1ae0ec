//! Function registry and dispatch.
//!
//! The [`Library`] maps qualified names to one [`FunctionDef`] per arity and
//! is the single entry point the embedding engine uses:
//! - static calls by name ([`Library::call`])
//! - named function references ([`Library::function_item`])
//! - dynamic calls of function items, including bound ones ([`Library::invoke`])

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};
use xqlib_foundation::{Error, FunctionItem, HandleId, Item, Result, Sequence};

use crate::context::Context;
use crate::signature::{FunctionName, Signature};

// =============================================================================
// Call
// =============================================================================

/// Arguments of one function call as seen by an implementation.
#[derive(Clone, Copy, Debug)]
pub struct Call<'a> {
    /// Qualified name of the function being called.
    pub name: &'static str,
    /// Positional arguments, already checked against the signature.
    pub args: &'a [Sequence],
    /// Context resource the called function item is bound to.
    pub captured: Option<HandleId>,
    /// The library the call was dispatched from, for calling function items.
    pub library: &'a Library,
}

impl<'a> Call<'a> {
    /// Returns the argument at `index`.
    pub fn arg(&self, index: usize) -> Result<&'a Sequence> {
        self.args.get(index).ok_or_else(|| {
            Error::internal(format!("{} called without argument {}", self.name, index + 1))
        })
    }

    /// Returns the argument at `index`, if supplied.
    #[must_use]
    pub fn opt_arg(&self, index: usize) -> Option<&'a Sequence> {
        self.args.get(index)
    }

    /// Returns the handle the function item was bound to.
    pub fn captured(&self) -> Result<HandleId> {
        self.captured
            .ok_or_else(|| Error::internal(format!("{} called without a bound resource", self.name)))
    }
}

/// Native implementation of a built-in function.
pub type NativeImpl = fn(&mut Context, &Call<'_>) -> Result<Sequence>;

// =============================================================================
// FunctionDef
// =============================================================================

/// Whether a definition can be resolved by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Resolvable by name and listed in [`Library::signatures`].
    Public,
    /// Reachable only through function items that name it.
    Internal,
}

/// A registered function: signature plus implementation.
#[derive(Clone)]
pub struct FunctionDef {
    /// The static signature.
    pub signature: Signature,
    /// The implementation.
    pub func: NativeImpl,
    /// Whether the function can be looked up by name.
    pub visibility: Visibility,
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("signature", &self.signature.to_string())
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Library
// =============================================================================

/// The function library.
///
/// Immutable once built, so one library can serve many contexts.
#[derive(Debug, Default)]
pub struct Library {
    /// Definitions by qualified name, one per arity.
    functions: HashMap<&'static str, Vec<FunctionDef>>,
}

impl Library {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard fn and math library.
    #[must_use]
    pub fn standard() -> Self {
        let mut library = Self::new();
        crate::functions::register_all(&mut library);
        debug!(functions = library.len(), "built standard function library");
        library
    }

    /// Registers a public function, replacing any definition with the same
    /// name and arity.
    pub fn register(&mut self, signature: Signature, func: NativeImpl) {
        self.insert(FunctionDef {
            signature,
            func,
            visibility: Visibility::Public,
        });
    }

    /// Registers a function reachable only through function items.
    pub fn register_internal(&mut self, signature: Signature, func: NativeImpl) {
        self.insert(FunctionDef {
            signature,
            func,
            visibility: Visibility::Internal,
        });
    }

    fn insert(&mut self, def: FunctionDef) {
        let overloads = self.functions.entry(def.signature.name).or_default();
        overloads.retain(|existing| {
            existing.signature.arity() != def.signature.arity()
                || existing.signature.variadic != def.signature.variadic
        });
        overloads.push(def);
    }

    /// Returns the number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn find(&self, qualified: &str, arity: usize) -> Option<&FunctionDef> {
        self.functions
            .get(qualified)?
            .iter()
            .find(|def| def.signature.admits(arity))
    }

    /// Looks up a public function by lexical name and arity.
    #[must_use]
    pub fn lookup(&self, name: &str, arity: usize) -> Option<&FunctionDef> {
        let name = FunctionName::parse(name)?;
        self.find(&name.qualified(), arity)
            .filter(|def| def.visibility == Visibility::Public)
    }

    /// Returns true if a public function with this name and arity exists.
    #[must_use]
    pub fn contains(&self, name: &str, arity: usize) -> bool {
        self.lookup(name, arity).is_some()
    }

    /// Returns a named function reference (`fn:abs#1`).
    ///
    /// Fails with `XPST0017` if no such function exists.
    pub fn function_item(&self, name: &str, arity: usize) -> Result<Item> {
        let def = self
            .lookup(name, arity)
            .ok_or_else(|| Error::unknown_function(name, arity))?;
        Ok(Item::Function(FunctionItem::named(def.signature.name, arity)))
    }

    /// Calls a public function by name.
    ///
    /// The arity is resolved first (`XPST0017`), then the arguments are
    /// checked against the signature (`XPTY0004`).
    pub fn call(&self, ctx: &mut Context, name: &str, args: &[Sequence]) -> Result<Sequence> {
        let def = self
            .lookup(name, args.len())
            .ok_or_else(|| Error::unknown_function(name, args.len()))?;
        self.dispatch(ctx, def, args, None)
    }

    /// Calls a function item.
    ///
    /// Bound items pass their captured handle to the implementation; maps
    /// are functions of one argument and return the value for that key.
    pub fn invoke(&self, ctx: &mut Context, function: &Item, args: &[Sequence]) -> Result<Sequence> {
        match function {
            Item::Function(f) => self.invoke_function(ctx, f, args),
            Item::Map(map) => {
                let [key] = args else {
                    return Err(Error::type_mismatch(
                        "a map called with one argument",
                        format!("{} arguments", args.len()),
                    ));
                };
                let key = key.as_single().ok_or_else(|| {
                    Error::type_mismatch("xs:anyAtomicType", crate::signature::describe(key))
                })?;
                Ok(map.get(key).cloned().unwrap_or_default())
            }
            other => Err(Error::type_mismatch("function(*)", other.item_type().to_string())),
        }
    }

    /// Calls a function item with the given arguments.
    pub fn invoke_function(
        &self,
        ctx: &mut Context,
        function: &FunctionItem,
        args: &[Sequence],
    ) -> Result<Sequence> {
        if args.len() != function.arity {
            return Err(Error::type_mismatch(
                format!("{function} called with {} arguments", function.arity),
                format!("{} arguments", args.len()),
            ));
        }
        let def = self
            .find(&function.name, function.arity)
            .ok_or_else(|| Error::unknown_function(function.name.to_string(), function.arity))?;
        self.dispatch(ctx, def, args, function.captured)
    }

    fn dispatch(
        &self,
        ctx: &mut Context,
        def: &FunctionDef,
        args: &[Sequence],
        captured: Option<HandleId>,
    ) -> Result<Sequence> {
        let signature = &def.signature;
        trace!(function = signature.name, arity = args.len(), "dispatch");

        let frame = || format!("{}#{}", signature.name, args.len());
        signature
            .check_args(args)
            .map_err(|e| e.in_function(frame()))?;

        let call = Call {
            name: signature.name,
            args,
            captured,
            library: self,
        };
        let result = (def.func)(ctx, &call).map_err(|e| e.in_function(frame()))?;
        debug_assert!(
            signature.returns.accepts(&result),
            "{} returned {:?}, declared {}",
            signature.name,
            result,
            signature.returns
        );
        Ok(result)
    }

    /// Returns the public signatures, ordered by name and arity.
    #[must_use]
    pub fn signatures(&self) -> Vec<&Signature> {
        let mut signatures: Vec<&Signature> = self
            .functions
            .values()
            .flatten()
            .filter(|def| def.visibility == Visibility::Public)
            .map(|def| &def.signature)
            .collect();
        signatures.sort_by(|a, b| a.name.cmp(b.name).then(a.arity().cmp(&b.arity())));
        signatures
    }
}
