//! Frequency buckets for O(1) LFU tracking.
//!
//! Entries are grouped by access frequency. Each bucket is an intrusive list
//! over one shared node arena, so an entry keeps the same [`SlotId`] for its
//! whole life no matter how often it changes bucket. Buckets are also linked
//! to their neighbouring frequencies, which keeps `min_freq` exact in O(1)
//! even when an arbitrary entry is removed from the minimum bucket.
//!
//! ## Architecture
//!
//! ```text
//!   nodes: SlotArena<Node<FreqEntry<T>>>
//!
//!   buckets: FxHashMap<u64, Bucket>   (frequency → list + neighbour links)
//!
//!   min_freq = 1
//!        │
//!        ▼
//!   freq=1: head ──► [id_2] ◄──► [id_1] ◄── tail   (evict tail first)
//!              │ next
//!              ▼
//!   freq=4: head ──► [id_0] ◄── tail
//! ```
//!
//! ## Touch Flow
//!
//! ```text
//!   touch(id_1):
//!     1. unlink id_1 from the freq=1 list
//!     2. freq=1 now empty? drop the bucket, relink 1's neighbours, and
//!        advance min_freq if it pointed at 1
//!     3. create the freq=2 bucket between 1 (or 1's prev) and 4 if missing
//!     4. push id_1 to the front of freq=2 (MRU within that frequency)
//! ```
//!
//! ## Operations
//!
//! | Operation  | Time | Notes                                    |
//! |------------|------|------------------------------------------|
//! | `insert`   | O(1) | new entry starts at frequency 1          |
//! | `touch`    | O(1) | frequency + 1, becomes bucket MRU        |
//! | `remove`   | O(1) | by handle                                |
//! | `pop_min`  | O(1) | tail of the `min_freq` bucket            |
//! | `peek_min` | O(1) | same victim, not removed                 |
//!
//! An emptied bucket is removed from the map immediately, so `bucket_count()`
//! always equals the number of distinct frequencies in use.

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::{ListLinks, Node, NodeArena};
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct FreqEntry<T> {
    value: T,
    freq: u64,
}

#[derive(Debug, Default)]
struct Bucket {
    links: ListLinks,
    prev: Option<u64>,
    next: Option<u64>,
}

/// O(1) LFU tracker with LRU tie-breaking inside a frequency.
///
/// # Example
///
/// ```
/// use flexcache::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// let a = freq.insert("a");
/// let b = freq.insert("b");
/// freq.touch(a);
///
/// assert_eq!(freq.frequency(a), Some(2));
/// assert_eq!(freq.frequency(b), Some(1));
/// assert_eq!(freq.min_freq(), Some(1));
/// assert_eq!(freq.pop_min(), Some(("b", 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<T> {
    nodes: NodeArena<FreqEntry<T>>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
}

impl<T> FrequencyBuckets<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotArena::new(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Creates an empty tracker with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of non-empty frequency buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Smallest frequency with a non-empty bucket; `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        (self.min_freq != 0).then_some(self.min_freq)
    }

    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        self.nodes.get(id).map(|node| node.value().freq)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.value().value)
    }

    /// Number of entries currently at `freq`.
    pub fn bucket_len(&self, freq: u64) -> usize {
        self.buckets.get(&freq).map_or(0, |bucket| bucket.links.len())
    }

    /// Tracks a new entry at frequency 1 and returns its handle.
    pub fn insert(&mut self, value: T) -> SlotId {
        let id = self.nodes.insert(Node::new(FreqEntry { value, freq: 1 }));
        if !self.buckets.contains_key(&1) {
            let next = self.min_freq();
            self.insert_bucket(1, None, next);
        }
        self.push_front(1, id);
        self.min_freq = 1;
        id
    }

    /// Increments the frequency of `id` and returns the new frequency.
    ///
    /// At `u64::MAX` the frequency saturates and the entry is only refreshed
    /// within its bucket.
    pub fn touch(&mut self, id: SlotId) -> Option<u64> {
        let freq = self.frequency(id)?;
        if freq == u64::MAX {
            let bucket = self.buckets.get_mut(&freq)?;
            bucket.links.move_to_front(&mut self.nodes, id);
            return Some(freq);
        }
        let next_freq = freq + 1;

        let (prev, next) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.prev, bucket.next)
        };

        let emptied = self.unlink(freq, id)?;
        if emptied {
            self.remove_bucket(freq);
        }

        if !self.buckets.contains_key(&next_freq) {
            let new_prev = if emptied { prev } else { Some(freq) };
            self.insert_bucket(next_freq, new_prev, next);
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.value_mut().freq = next_freq;
        }
        self.push_front(next_freq, id);
        if self.min_freq == 0 || next_freq < self.min_freq {
            self.min_freq = next_freq;
        }
        Some(next_freq)
    }

    /// Stops tracking `id` and returns its payload.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let freq = self.frequency(id)?;
        if self.unlink(freq, id)? {
            self.remove_bucket(freq);
        }
        self.nodes.remove(id).map(|node| node.into_value().value)
    }

    /// Removes the eviction victim: the tail of the `min_freq` bucket.
    pub fn pop_min(&mut self) -> Option<(T, u64)> {
        let freq = self.min_freq()?;
        let (id, emptied) = {
            let bucket = self.buckets.get_mut(&freq)?;
            let id = bucket.links.pop_back(&mut self.nodes)?;
            (id, bucket.links.is_empty())
        };
        if emptied {
            self.remove_bucket(freq);
        }
        self.nodes
            .remove(id)
            .map(|node| (node.into_value().value, freq))
    }

    /// Returns the victim `pop_min` would remove, without removing it.
    pub fn peek_min(&self) -> Option<(&T, u64)> {
        let freq = self.min_freq()?;
        let id = self.buckets.get(&freq)?.links.back_id()?;
        self.get(id).map(|value| (value, freq))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Verifies bucket membership, bucket links and `min_freq`.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut linked = 0usize;
        for (&freq, bucket) in &self.buckets {
            if bucket.links.is_empty() {
                return Err(InvariantError::new(format!(
                    "frequency bucket {freq} is empty but still mapped"
                )));
            }
            bucket.links.check_invariants(&self.nodes)?;
            for id in bucket.links.iter_ids(&self.nodes) {
                let entry_freq = self.frequency(id).unwrap_or(0);
                if entry_freq != freq {
                    return Err(InvariantError::new(format!(
                        "entry {} has frequency {entry_freq} but sits in bucket {freq}",
                        id.index()
                    )));
                }
            }
            linked += bucket.links.len();
        }
        if linked != self.nodes.len() {
            return Err(InvariantError::new(format!(
                "{} entries tracked but {linked} linked into buckets",
                self.nodes.len()
            )));
        }

        let actual_min = self.buckets.keys().copied().min().unwrap_or(0);
        if self.min_freq != actual_min {
            return Err(InvariantError::new(format!(
                "min_freq is {} but the smallest bucket is {actual_min}",
                self.min_freq
            )));
        }

        // the bucket chain must visit every bucket in ascending order
        let mut visited = 0usize;
        let mut prev: Option<u64> = None;
        let mut current = self.min_freq();
        while let Some(freq) = current {
            let bucket = self.buckets.get(&freq).ok_or_else(|| {
                InvariantError::new(format!("bucket chain points at missing bucket {freq}"))
            })?;
            if bucket.prev != prev || prev.is_some_and(|p| p >= freq) {
                return Err(InvariantError::new(format!(
                    "bucket {freq} is out of order in the frequency chain"
                )));
            }
            visited += 1;
            prev = Some(freq);
            current = bucket.next;
        }
        if visited != self.buckets.len() {
            return Err(InvariantError::new(format!(
                "frequency chain reaches {visited} of {} buckets",
                self.buckets.len()
            )));
        }
        Ok(())
    }

    fn push_front(&mut self, freq: u64, id: SlotId) {
        let bucket = self
            .buckets
            .get_mut(&freq)
            .expect("frequency bucket must exist before linking into it");
        bucket.links.push_front(&mut self.nodes, id);
    }

    /// Unlinks `id` from bucket `freq`; returns whether the bucket emptied.
    fn unlink(&mut self, freq: u64, id: SlotId) -> Option<bool> {
        let bucket = self.buckets.get_mut(&freq)?;
        bucket.links.unlink(&mut self.nodes, id);
        Some(bucket.links.is_empty())
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                links: ListLinks::new(),
                prev,
                next,
            },
        );
        if let Some(bucket) = prev.and_then(|p| self.buckets.get_mut(&p)) {
            bucket.next = Some(freq);
        }
        if let Some(bucket) = next.and_then(|n| self.buckets.get_mut(&n)) {
            bucket.prev = Some(freq);
        }
        if prev.is_none() {
            self.min_freq = freq;
        }
    }

    fn remove_bucket(&mut self, freq: u64) {
        let Some(bucket) = self.buckets.remove(&freq) else {
            return;
        };
        if let Some(prev) = bucket.prev.and_then(|p| self.buckets.get_mut(&p)) {
            prev.next = bucket.next;
        }
        if let Some(next) = bucket.next.and_then(|n| self.buckets.get_mut(&n)) {
            next.prev = bucket.prev;
        }
        if self.min_freq == freq {
            self.min_freq = bucket.next.unwrap_or(0);
        }
    }
}

impl<T> Default for FrequencyBuckets<T> {
    fn default() -> Self {
        Self::new()
    }
}
