//! Count table shared by both lossy counting variants

use core::hash::Hash;

#[cfg(feature = "std")]
use std::{
    collections::hash_map::{Entry, HashMap},
    vec::Vec,
};
#[cfg(feature = "std")]
use xxhash_rust::xxh3::Xxh3Builder;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{
    collections::btree_map::{BTreeMap, Entry},
    vec::Vec,
};

#[cfg(feature = "std")]
type EntryMap<T> = HashMap<T, CountEntry, Xxh3Builder>;
#[cfg(not(feature = "std"))]
type EntryMap<T> = BTreeMap<T, CountEntry>;

#[cfg(feature = "std")]
fn new_map<T>() -> EntryMap<T> {
    // Fixed seed keeps iteration order identical across runs
    HashMap::with_hasher(Xxh3Builder::new())
}

#[cfg(not(feature = "std"))]
fn new_map<T: Ord>() -> EntryMap<T> {
    BTreeMap::new()
}

/// Per-symbol record kept by a counter
///
/// Both variants use the same shape. For the individual-delta counter
/// `delta` is the bucket index at insertion minus one and never changes.
/// For the shared-delta counter it records the engine delta inherited at
/// insertion; the counter's current delta governs its bounds and pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountEntry {
    /// Approximate occurrence count (at least 1)
    pub count: u64,
    /// Error term fixed at insertion
    pub delta: u64,
}

impl CountEntry {
    /// Create a new entry
    pub fn new(count: u64, delta: u64) -> Self {
        Self { count, delta }
    }
}

/// Mapping from symbol to its [`CountEntry`]
///
/// Owned exclusively by one counter for one pass. Iteration order is
/// deterministic for a given sequence of operations; callers needing a
/// ranking use [`CountTable::ranked`].
#[derive(Clone, Debug)]
pub struct CountTable<T: Hash + Ord + Clone + core::fmt::Debug> {
    entries: EntryMap<T>,
}

impl<T: Hash + Ord + Clone + core::fmt::Debug> CountTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: new_map(),
        }
    }

    /// Look up the entry of a symbol
    pub fn get(&self, item: &T) -> Option<CountEntry> {
        self.entries.get(item).copied()
    }

    /// Insert or update the entry of a symbol
    ///
    /// `f` receives the current entry (`None` when absent) and returns the
    /// entry to store.
    pub fn upsert<F>(&mut self, item: T, f: F)
    where
        F: FnOnce(Option<CountEntry>) -> CountEntry,
    {
        match self.entries.entry(item) {
            Entry::Occupied(mut slot) => {
                let updated = f(Some(*slot.get()));
                *slot.get_mut() = updated;
            }
            Entry::Vacant(slot) => {
                slot.insert(f(None));
            }
        }
    }

    /// Remove a symbol, returning its entry
    pub fn remove(&mut self, item: &T) -> Option<CountEntry> {
        self.entries.remove(item)
    }

    /// Keep only the entries for which `keep` returns true
    ///
    /// Returns the number of removed entries.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T, &CountEntry) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|item, entry| keep(item, entry));
        before - self.entries.len()
    }

    /// Iterate over `(symbol, entry)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&T, &CountEntry)> {
        self.entries.iter()
    }

    /// Check if a symbol is tracked
    pub fn contains(&self, item: &T) -> bool {
        self.entries.contains_key(item)
    }

    /// Number of tracked symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no symbol is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries ordered by count descending, ties by symbol ascending
    pub fn ranked(&self) -> Vec<(&T, &CountEntry)> {
        let mut items: Vec<_> = self.entries.iter().collect();
        items.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        items
    }

    /// Entries ordered by symbol
    pub fn sorted(&self) -> Vec<(&T, &CountEntry)> {
        let mut items: Vec<_> = self.entries.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        items
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.entries.len() * (core::mem::size_of::<T>() + core::mem::size_of::<CountEntry>())
    }
}

impl<T: Hash + Ord + Clone + core::fmt::Debug> Default for CountTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "serde")]
impl<T: Hash + Ord + Clone + core::fmt::Debug + serde::Serialize> serde::Serialize
    for CountTable<T>
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let items = self.sorted();
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for (item, entry) in items {
            seq.serialize_element(&(item, entry.count, entry.delta))?;
        }
        seq.end()
    }
}
