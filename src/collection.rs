//! Ordered entity sequences keyed by id.
//!
//! Every operation takes the current sequence by reference and returns a new
//! one, so callers never observe a half-applied mutation. The same functions
//! back both the per-day item list and the day list.

use crate::domain::{Day, Item};

pub trait Keyed {
    fn id(&self) -> &str;
}

impl Keyed for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyed for Day {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn position<T: Keyed>(entries: &[T], id: &str) -> Option<usize> {
    entries.iter().position(|entry| entry.id() == id)
}

pub fn contains<T: Keyed>(entries: &[T], id: &str) -> bool {
    position(entries, id).is_some()
}

/// Appends `entry`. Panics if its id is already present.
pub fn insert<T: Keyed + Clone>(entries: &[T], entry: T) -> Vec<T> {
    assert!(
        !contains(entries, entry.id()),
        "duplicate id inserted: {}",
        entry.id()
    );
    let mut next = entries.to_vec();
    next.push(entry);
    next
}

/// Inserts `entry` at `index`, clamped to the end of the sequence.
pub fn insert_at<T: Keyed + Clone>(entries: &[T], index: usize, entry: T) -> Vec<T> {
    assert!(
        !contains(entries, entry.id()),
        "duplicate id inserted: {}",
        entry.id()
    );
    let mut next = entries.to_vec();
    next.insert(index.min(next.len()), entry);
    next
}

/// Replaces the entry sharing `updated`'s id in place. Panics if there is none.
pub fn replace<T: Keyed + Clone>(entries: &[T], updated: T) -> Vec<T> {
    let Some(index) = position(entries, updated.id()) else {
        panic!("no entry with id {} to replace", updated.id());
    };
    let mut next = entries.to_vec();
    next[index] = updated;
    next
}

pub fn remove_by_id<T: Keyed + Clone>(entries: &[T], id: &str) -> Vec<T> {
    entries
        .iter()
        .filter(|entry| entry.id() != id)
        .cloned()
        .collect()
}

/// Moves the entry at `source` so it ends up at `destination`.
///
/// Out-of-range indices leave the sequence untouched: drag gestures can
/// report them while the pointer leaves the list.
pub fn reorder<T: Clone>(entries: &[T], source: usize, destination: usize) -> Vec<T> {
    let mut next = entries.to_vec();
    if source >= next.len() || destination >= next.len() || source == destination {
        return next;
    }

    let moved = next.remove(source);
    next.insert(destination, moved);
    next
}
