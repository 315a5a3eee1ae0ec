//! Core item type for all xqlib data.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::Result;
use crate::error::Error;
use crate::handle::HandleId;
use crate::sequence::XqMap;
use crate::types::ItemType;

/// A single XQuery item.
///
/// Items are immutable and cheaply cloneable (O(1) for every variant).
/// Maps use structural sharing via persistent data structures.
#[derive(Clone)]
pub enum Item {
    /// `xs:boolean`
    Boolean(bool),
    /// `xs:integer`, limited to 64 bits.
    Integer(i64),
    /// `xs:double`
    Double(f64),
    /// `xs:string`
    String(Arc<str>),
    /// `map(*)`
    Map(XqMap),
    /// A function item.
    Function(FunctionItem),
}

/// Reference to a registered function.
///
/// A function item names a library function and its arity. Functions that
/// need per-evaluation state carry an explicit `captured` handle into the
/// dynamic context instead of owning the state.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FunctionItem {
    /// Qualified function name, e.g. `fn:abs`.
    pub name: Arc<str>,
    /// Number of arguments the function takes.
    pub arity: usize,
    /// Context resource the function is bound to, if any.
    pub captured: Option<HandleId>,
}

impl FunctionItem {
    /// Creates a reference to a named function.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            captured: None,
        }
    }

    /// Creates a function bound to a context resource.
    #[must_use]
    pub fn bound(name: impl Into<Arc<str>>, arity: usize, handle: HandleId) -> Self {
        Self {
            name: name.into(),
            arity,
            captured: Some(handle),
        }
    }
}

impl Item {
    /// Returns the most specific item type of this item.
    #[must_use]
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Boolean(_) => ItemType::Boolean,
            Self::Integer(_) => ItemType::Integer,
            Self::Double(_) => ItemType::Double,
            Self::String(_) => ItemType::String,
            Self::Map(_) => ItemType::Map,
            Self::Function(f) => ItemType::Function(crate::types::Arity::Exact(f.arity)),
        }
    }

    /// Returns true for atomic values (anything but maps and functions).
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        !matches!(self, Self::Map(_) | Self::Function(_))
    }

    /// Returns true for integers and doubles.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Double(_))
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a double value.
    #[must_use]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (promotes integers).
    ///
    /// Note: Converting large i64 values to f64 may lose precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a map reference.
    #[must_use]
    pub const fn as_map(&self) -> Option<&XqMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to extract a function reference.
    #[must_use]
    pub const fn as_function(&self) -> Option<&FunctionItem> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the string value of an atomic item.
    ///
    /// Maps and functions have no string value and fail with `XPTY0004`.
    pub fn string_value(&self) -> Result<String> {
        match self {
            Self::Boolean(b) => Ok(b.to_string()),
            Self::Integer(n) => Ok(n.to_string()),
            Self::Double(n) => Ok(format_double(*n)),
            Self::String(s) => Ok(s.to_string()),
            Self::Map(_) | Self::Function(_) => Err(Error::type_mismatch(
                "xs:anyAtomicType",
                self.item_type().to_string(),
            )),
        }
    }
}

/// Formats a double in its XPath canonical lexical form.
///
/// Values with magnitude in `[1e-6, 1e6)` use plain decimal notation without
/// a trailing `.0`; everything else uses scientific notation with at least
/// one fractional digit in the mantissa (`1.0E20`).
#[must_use]
pub fn format_double(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e6).contains(&magnitude) {
        return n.to_string();
    }
    let sci = format!("{n:E}");
    match sci.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.0E{exponent}")
        }
        _ => sci,
    }
}

// Bitwise float equality keeps Eq reflexive and consistent with Hash
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Boolean(b) => b.hash(state),
            Self::Integer(n) => n.hash(state),
            Self::Double(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::Map(m) => m.hash(state),
            Self::Function(f) => f.hash(state),
        }
    }
}

impl PartialOrd for Item {
    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::Double(a), Self::Double(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Double(b)) => (*a as f64).partial_cmp(b),
            (Self::Double(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}()"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "xs:double('{}')", format_double(*n)),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Map(m) => write!(f, "{m:?}"),
            Self::Function(func) => write!(f, "{func:?}"),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "{}", format_double(*n)),
            Self::String(s) => write!(f, "{s}"),
            Self::Map(m) => {
                write!(f, "map{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Function(func) => write!(f, "{func}"),
        }
    }
}

impl fmt::Debug for FunctionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.captured {
            Some(handle) => write!(f, "{}#{} bound to {handle:?}", self.name, self.arity),
            None => write!(f, "{}#{}", self.name, self.arity),
        }
    }
}

impl fmt::Display for FunctionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.arity)
    }
}

// Convenience From implementations

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Item {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Item {
    fn from(n: f64) -> Self {
        Self::Double(n)
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Item {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<XqMap> for Item {
    fn from(m: XqMap) -> Self {
        Self::Map(m)
    }
}

impl From<FunctionItem> for Item {
    fn from(f: FunctionItem) -> Self {
        Self::Function(f)
    }
}
