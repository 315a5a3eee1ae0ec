//! Generational handles into context-owned resources.
//!
//! Function items that close over mutable state (the random-number-generator
//! record's `next` and `permute`) hold a [`HandleId`] rather than the state
//! itself. The state lives in a [`HandleArena`] owned by the dynamic context.

// Handles index with u32; arenas never approach that many slots
#![allow(clippy::cast_possible_truncation)]

use std::fmt;

use crate::Result;
use crate::error::Error;

/// Handle with a generational index for stale reference detection.
///
/// The generation counter increments when a slot is reused after removal,
/// so a handle that outlived its resource is rejected instead of silently
/// aliasing a newer one.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct HandleId {
    /// Index into the arena.
    pub index: u32,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl HandleId {
    /// Creates a new handle with the given index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandleId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

struct Slot<T> {
    /// Odd generations are live, even generations are free.
    generation: u32,
    value: Option<T>,
}

/// Arena of values addressed by [`HandleId`].
///
/// Removed slots go onto a free list and are reused with a bumped generation.
pub struct HandleArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    live_count: usize,
}

impl<T> Default for HandleArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleArena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live_count: 0,
        }
    }

    /// Stores a value and returns its handle.
    pub fn insert(&mut self, value: T) -> HandleId {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.value = Some(value);
            HandleId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            HandleId::new(index, 1)
        }
    }

    /// Returns true if the handle refers to a live value.
    #[must_use]
    pub fn is_valid(&self, id: HandleId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.generation == id.generation && id.generation % 2 == 1)
    }

    /// Gets a value by handle.
    pub fn get(&self, id: HandleId) -> Result<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
            .ok_or_else(|| Error::stale_handle(id))
    }

    /// Gets a mutable value by handle.
    pub fn get_mut(&mut self, id: HandleId) -> Result<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
            .ok_or_else(|| Error::stale_handle(id))
    }

    /// Removes a value, invalidating its handle.
    pub fn remove(&mut self, id: HandleId) -> Result<T> {
        if !self.is_valid(id) {
            return Err(Error::stale_handle(id));
        }
        let slot = &mut self.slots[id.index as usize];
        slot.generation += 1;
        self.free_list.push(id.index);
        self.live_count -= 1;
        slot.value.take().ok_or_else(|| Error::stale_handle(id))
    }

    /// Returns the number of live values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if the arena holds no live values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }
}

impl<T> fmt::Debug for HandleArena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleArena")
            .field("slots", &self.slots.len())
            .field("live", &self.live_count)
            .finish()
    }
}
