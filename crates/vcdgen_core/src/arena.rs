//! Dense, handle-indexed storage for signals and modules.
//!
//! Items are only ever appended, so a handle stays valid for the lifetime of
//! its arena. Every arena draws a process-unique tag at construction and
//! stamps it into the handles it mints; a lookup with a handle carrying any
//! other tag yields `None`, even when its index would be in range.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

/// Tag 0 is never issued.
static NEXT_ARENA_TAG: AtomicU32 = AtomicU32::new(1);

/// Trait for opaque handle types used as arena keys.
pub trait ArenaId: Copy {
    /// Builds a handle from an arena tag and an index.
    fn from_parts(arena: u32, index: u32) -> Self;

    /// Tag of the arena that minted the handle.
    fn arena(self) -> u32;

    /// Position within the arena.
    fn index(self) -> u32;
}

/// Append-only container addressed by handles of type `I`.
#[derive(Debug, Clone)]
pub struct Arena<I: ArenaId, T> {
    tag: u32,
    items: Vec<T>,
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates a new, empty arena with a fresh tag.
    pub fn new() -> Self {
        Self {
            tag: NEXT_ARENA_TAG.fetch_add(1, Ordering::Relaxed),
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Appends an item and returns its handle.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_parts(self.tag, self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Whether `id` was minted by this arena.
    pub fn owns(&self, id: I) -> bool {
        id.arena() == self.tag && (id.index() as usize) < self.items.len()
    }

    /// Returns the item for `id`, or `None` if the handle is foreign or out of range.
    pub fn get(&self, id: I) -> Option<&T> {
        if id.arena() != self.tag {
            return None;
        }
        self.items.get(id.index() as usize)
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        if id.arena() != self.tag {
            return None;
        }
        self.items.get_mut(id.index() as usize)
    }

    /// Returns the number of items in the arena.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the arena contains no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over `(handle, &T)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        let tag = self.tag;
        self.items
            .iter()
            .enumerate()
            .map(move |(i, item)| (I::from_parts(tag, i as u32), item))
    }
}
