//! Persistent sequences and maps with structural sharing.
//!
//! These are thin wrappers around the `im` crate's persistent data structures,
//! giving the XQuery value model O(1) clones and O(log n) indexed access.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::iter::FromIterator;

use crate::item::Item;

/// An ordered, possibly empty collection of items.
///
/// Cloning is O(1). Modifications return a new sequence sharing structure
/// with the original.
#[derive(Clone, Default)]
pub struct Sequence(im::Vector<Item>);

impl Sequence {
    /// Creates an empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self(im::Vector::new())
    }

    /// Creates a sequence of exactly one item.
    #[must_use]
    pub fn one(item: impl Into<Item>) -> Self {
        Self(im::Vector::unit(item.into()))
    }

    /// Creates a sequence from an optional item.
    #[must_use]
    pub fn from_option(item: Option<Item>) -> Self {
        item.map_or_else(Self::empty, Self::one)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets an item by zero-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.0.get(index)
    }

    /// Returns the first item.
    #[must_use]
    pub fn first(&self) -> Option<&Item> {
        self.0.front()
    }

    /// Returns the last item.
    #[must_use]
    pub fn last(&self) -> Option<&Item> {
        self.0.back()
    }

    /// Returns the item if the sequence has exactly one.
    #[must_use]
    pub fn as_single(&self) -> Option<&Item> {
        if self.0.len() == 1 { self.0.front() } else { None }
    }

    /// Returns a new sequence with the item appended.
    #[must_use]
    pub fn push_back(&self, item: impl Into<Item>) -> Self {
        let mut new = self.0.clone();
        new.push_back(item.into());
        Self(new)
    }

    /// Returns the concatenation of this sequence and another.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut new = self.0.clone();
        new.append(other.0.clone());
        Self(new)
    }

    /// Returns the items in `start..end` (clamped to the sequence bounds).
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len());
        let start = start.min(end);
        Self(self.0.clone().slice(start..end))
    }

    /// Returns a new sequence with the items in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        self.iter().rev().cloned().collect()
    }

    /// Returns an iterator over the items.
    pub fn iter(&self) -> im::vector::Iter<'_, Item> {
        self.0.iter()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item:?}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, ")")
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Sequence {}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl FromIterator<Item> for Sequence {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self(im::Vector::from_iter(iter))
    }
}

impl IntoIterator for Sequence {
    type Item = Item;
    type IntoIter = im::vector::ConsumingIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Item;
    type IntoIter = im::vector::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Item> for Sequence {
    fn from(item: Item) -> Self {
        Self::one(item)
    }
}

impl<T: Into<Item>> From<Vec<T>> for Sequence {
    fn from(v: Vec<T>) -> Self {
        v.into_iter().map(Into::into).collect()
    }
}

/// Persistent map keyed by atomic items.
#[derive(Clone, Default)]
pub struct XqMap(im::HashMap<Item, Sequence>);

impl XqMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(im::HashMap::new())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &Item) -> Option<&Sequence> {
        self.0.get(key)
    }

    /// Gets a value by string key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Sequence> {
        self.0.get(&Item::from(key))
    }

    /// Returns true if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &Item) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a new map with the entry inserted.
    #[must_use]
    pub fn insert(&self, key: impl Into<Item>, value: impl Into<Sequence>) -> Self {
        let mut new = self.0.clone();
        new.insert(key.into(), value.into());
        Self(new)
    }

    /// Returns an iterator over key-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Item, &Sequence)> {
        self.0.iter()
    }

    /// Returns an iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &Item> {
        self.0.keys()
    }
}

impl fmt::Debug for XqMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl PartialEq for XqMap {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for XqMap {}

// Entry order varies between equal maps, so entries combine commutatively
impl Hash for XqMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        let combined = self.iter().fold(0u64, |acc, (k, v)| {
            let mut entry = DefaultHasher::new();
            k.hash(&mut entry);
            v.hash(&mut entry);
            acc.wrapping_add(entry.finish())
        });
        combined.hash(state);
    }
}

impl FromIterator<(Item, Sequence)> for XqMap {
    fn from_iter<I: IntoIterator<Item = (Item, Sequence)>>(iter: I) -> Self {
        Self(im::HashMap::from_iter(iter))
    }
}
