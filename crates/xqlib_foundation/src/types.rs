//! Sequence type descriptors for function signatures.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::sequence::Sequence;

/// Item type descriptor.
///
/// A deliberately small subset of the XQuery item types: enough to declare
/// and check the signatures of the built-in function library.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ItemType {
    /// `item()`: accepts anything.
    Item,
    /// `xs:anyAtomicType`: any non-function, non-map item.
    AnyAtomic,
    /// `xs:boolean`
    Boolean,
    /// `xs:integer`
    Integer,
    /// `xs:double`
    Double,
    /// `xs:numeric`: integer or double.
    Numeric,
    /// `xs:string`
    String,
    /// `map(*)`
    Map,
    /// Function type with the given arity.
    Function(Arity),
}

/// The number of arguments a function accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Arity {
    /// Exactly N arguments.
    Exact(usize),
    /// Between min and max arguments (inclusive).
    Range(usize, usize),
    /// At least N arguments, then any number more.
    Variadic(usize),
}

impl Arity {
    /// Returns true if a call with `count` arguments satisfies this arity.
    #[must_use]
    pub const fn admits(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => count >= min && count <= max,
            Self::Variadic(min) => count >= min,
        }
    }
}

/// How many items a sequence type allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Occurrence {
    /// Exactly one item.
    One,
    /// `?`
    ZeroOrOne,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl Occurrence {
    /// Returns true if a sequence of `len` items satisfies this occurrence.
    #[must_use]
    pub const fn admits(self, len: usize) -> bool {
        match self {
            Self::One => len == 1,
            Self::ZeroOrOne => len <= 1,
            Self::ZeroOrMore => true,
            Self::OneOrMore => len >= 1,
        }
    }

    const fn indicator(self) -> &'static str {
        match self {
            Self::One => "",
            Self::ZeroOrOne => "?",
            Self::ZeroOrMore => "*",
            Self::OneOrMore => "+",
        }
    }
}

/// A sequence type: an item type plus an occurrence indicator.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceType {
    /// The type every item must have.
    pub item: ItemType,
    /// How many items are allowed.
    pub occurrence: Occurrence,
}

impl ItemType {
    /// Wraps this item type with exactly-one occurrence.
    #[must_use]
    pub const fn one(self) -> SequenceType {
        SequenceType::new(self, Occurrence::One)
    }

    /// Wraps this item type with `?` occurrence.
    #[must_use]
    pub const fn optional(self) -> SequenceType {
        SequenceType::new(self, Occurrence::ZeroOrOne)
    }

    /// Wraps this item type with `*` occurrence.
    #[must_use]
    pub const fn star(self) -> SequenceType {
        SequenceType::new(self, Occurrence::ZeroOrMore)
    }

    /// Wraps this item type with `+` occurrence.
    #[must_use]
    pub const fn plus(self) -> SequenceType {
        SequenceType::new(self, Occurrence::OneOrMore)
    }

    /// Returns true if this type is `item()`.
    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::Item)
    }

    /// Checks whether an item is an instance of this type.
    ///
    /// `xs:double` accepts integers (numeric promotion); `xs:numeric`
    /// accepts both numeric kinds.
    #[must_use]
    pub fn accepts(self, item: &Item) -> bool {
        match (self, item) {
            (Self::Item, _)
            | (Self::Boolean, Item::Boolean(_))
            | (Self::Integer, Item::Integer(_))
            | (Self::Double | Self::Numeric, Item::Integer(_) | Item::Double(_))
            | (Self::String, Item::String(_))
            | (Self::Map, Item::Map(_)) => true,
            (Self::AnyAtomic, item) => item.is_atomic(),
            (Self::Function(arity), Item::Function(f)) => arity.admits(f.arity),
            // Maps are functions of one argument
            (Self::Function(arity), Item::Map(_)) => arity.admits(1),
            _ => false,
        }
    }
}

impl SequenceType {
    /// Creates a sequence type.
    #[must_use]
    pub const fn new(item: ItemType, occurrence: Occurrence) -> Self {
        Self { item, occurrence }
    }

    /// The `empty-sequence()` type is not representable; `item()*` is the
    /// most general type.
    #[must_use]
    pub const fn any() -> Self {
        Self::new(ItemType::Item, Occurrence::ZeroOrMore)
    }

    /// Checks whether a sequence is an instance of this type.
    #[must_use]
    pub fn accepts(&self, seq: &Sequence) -> bool {
        self.occurrence.admits(seq.len()) && seq.iter().all(|item| self.item.accepts(item))
    }
}

impl fmt::Debug for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => write!(f, "item()"),
            Self::AnyAtomic => write!(f, "xs:anyAtomicType"),
            Self::Boolean => write!(f, "xs:boolean"),
            Self::Integer => write!(f, "xs:integer"),
            Self::Double => write!(f, "xs:double"),
            Self::Numeric => write!(f, "xs:numeric"),
            Self::String => write!(f, "xs:string"),
            Self::Map => write!(f, "map(*)"),
            Self::Function(_) => write!(f, "function(*)"),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Debug for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{}", self.item, self.occurrence.indicator())
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
