//! Bounded pile of collected fish
//!
//! Arrival order is kept; once the pile is full the oldest entry is released to
//! make room for the newest.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pile<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> Pile<T> {
    /// A pile holding at most `capacity` entries. Capacity 0 keeps nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `item`, then evict the oldest entry if over capacity.
    /// Returns the released entry, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        self.entries.push_back(item);
        if self.entries.len() > self.capacity {
            return self.entries.pop_front();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Release every entry, oldest first
    pub fn clear(&mut self) -> Vec<T> {
        self.entries.drain(..).collect()
    }
}
