//! Rank buckets: entries grouped by an integer rank, lowest rank evicted first.
//!
//! Each distinct rank owns an intrusive list over one shared node arena.
//! Buckets are kept in a `BTreeMap` so the minimum rank is the first key; a
//! bucket is dropped as soon as it empties, so the first key is always a
//! non-empty bucket.
//!
//! ```text
//!   buckets: BTreeMap<Rank, ListLinks>
//!
//!   rank 1: head ─► [id_4] ◄──► [id_0] ◄── tail   ◄── pop_min takes id_0
//!   rank 3: head ─► [id_2] ◄── tail
//!   rank 9: head ─► [id_1] ◄──► [id_3] ◄── tail
//! ```
//!
//! Within a bucket the head is the most recently linked entry. Whether that
//! order means "recently used" or only "recently inserted" is up to the
//! caller: `touch` refreshes an entry, and callers that never touch get
//! insertion order.
//!
//! | Operation  | Time         |
//! |------------|--------------|
//! | `insert`   | O(log R)     |
//! | `touch`    | O(log R)     |
//! | `set_rank` | O(log R)     |
//! | `remove`   | O(log R)     |
//! | `pop_min`  | O(log R)     |
//!
//! `R` is the number of distinct ranks currently in use.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::ds::intrusive_list::{ListLinks, Node, NodeArena};
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Integer eviction priority; lower ranks are evicted first.
pub type Rank = i64;

#[derive(Debug)]
struct RankEntry<T> {
    value: T,
    rank: Rank,
}

/// Entries bucketed by rank with per-bucket recency order.
///
/// # Example
///
/// ```
/// use flexcache::ds::RankBuckets;
///
/// let mut ranks = RankBuckets::new();
/// let low = ranks.insert("low", 1);
/// let high = ranks.insert("high", 7);
///
/// assert_eq!(ranks.min_rank(), Some(1));
/// assert_eq!(ranks.set_rank(low, 9), Some(1));
/// assert_eq!(ranks.pop_min(), Some(("high", 7)));
/// assert_eq!(ranks.rank(high), None);
/// ```
#[derive(Debug)]
pub struct RankBuckets<T> {
    nodes: NodeArena<RankEntry<T>>,
    buckets: BTreeMap<Rank, ListLinks>,
}

impl<T> RankBuckets<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotArena::new(),
            buckets: BTreeMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            buckets: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Lowest rank in use.
    pub fn min_rank(&self) -> Option<Rank> {
        self.buckets.first_key_value().map(|(&rank, _)| rank)
    }

    pub fn rank(&self, id: SlotId) -> Option<Rank> {
        self.nodes.get(id).map(|node| node.value().rank)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.value().value)
    }

    pub fn bucket_len(&self, rank: Rank) -> usize {
        self.buckets.get(&rank).map_or(0, ListLinks::len)
    }

    /// Links `value` at the front of the `rank` bucket.
    pub fn insert(&mut self, value: T, rank: Rank) -> SlotId {
        let id = self.nodes.insert(Node::new(RankEntry { value, rank }));
        self.buckets
            .entry(rank)
            .or_default()
            .push_front(&mut self.nodes, id);
        id
    }

    /// Moves `id` to the front of its current bucket.
    pub fn touch(&mut self, id: SlotId) -> bool {
        let Some(rank) = self.rank(id) else {
            return false;
        };
        match self.buckets.get_mut(&rank) {
            Some(links) => links.move_to_front(&mut self.nodes, id),
            None => false,
        }
    }

    /// Re-files `id` at the front of the `rank` bucket and returns the old rank.
    ///
    /// Passing the current rank refreshes the entry within its bucket.
    pub fn set_rank(&mut self, id: SlotId, rank: Rank) -> Option<Rank> {
        let old = self.rank(id)?;
        if old == rank {
            self.touch(id);
            return Some(old);
        }
        self.unlink(old, id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.value_mut().rank = rank;
        }
        self.buckets
            .entry(rank)
            .or_default()
            .push_front(&mut self.nodes, id);
        Some(old)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let rank = self.rank(id)?;
        self.unlink(rank, id);
        self.nodes.remove(id).map(|node| node.into_value().value)
    }

    /// Removes the tail of the lowest-rank bucket.
    pub fn pop_min(&mut self) -> Option<(T, Rank)> {
        let mut bucket = self.buckets.first_entry()?;
        let rank = *bucket.key();
        let id = bucket.get_mut().pop_back(&mut self.nodes)?;
        if bucket.get().is_empty() {
            bucket.remove();
        }
        self.nodes
            .remove(id)
            .map(|node| (node.into_value().value, rank))
    }

    pub fn peek_min(&self) -> Option<(&T, Rank)> {
        let (&rank, links) = self.buckets.first_key_value()?;
        let id = links.back_id()?;
        self.get(id).map(|value| (value, rank))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut linked = 0usize;
        for (&rank, links) in &self.buckets {
            if links.is_empty() {
                return Err(InvariantError::new(format!(
                    "rank bucket {rank} is empty but still mapped"
                )));
            }
            links.check_invariants(&self.nodes)?;
            for id in links.iter_ids(&self.nodes) {
                if self.rank(id) != Some(rank) {
                    return Err(InvariantError::new(format!(
                        "entry {} sits in rank bucket {rank} with rank {:?}",
                        id.index(),
                        self.rank(id)
                    )));
                }
            }
            linked += links.len();
        }
        if linked != self.nodes.len() {
            return Err(InvariantError::new(format!(
                "{} ranked entries tracked but {linked} linked into buckets",
                self.nodes.len()
            )));
        }
        Ok(())
    }

    fn unlink(&mut self, rank: Rank, id: SlotId) {
        if let Entry::Occupied(mut bucket) = self.buckets.entry(rank) {
            bucket.get_mut().unlink(&mut self.nodes, id);
            if bucket.get().is_empty() {
                bucket.remove();
            }
        }
    }
}

impl<T> Default for RankBuckets<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_min_takes_lowest_rank_oldest_first() {
        let mut ranks = RankBuckets::new();
        ranks.insert('a', 2);
        ranks.insert('b', 1);
        ranks.insert('c', 1);
        ranks.insert('d', 5);

        assert_eq!(ranks.bucket_count(), 3);
        assert_eq!(ranks.peek_min(), Some((&'b', 1)));
        assert_eq!(ranks.pop_min(), Some(('b', 1)));
        assert_eq!(ranks.pop_min(), Some(('c', 1)));
        assert_eq!(ranks.bucket_count(), 2);
        assert_eq!(ranks.pop_min(), Some(('a', 2)));
        assert_eq!(ranks.pop_min(), Some(('d', 5)));
        assert_eq!(ranks.pop_min(), None);
        ranks.check_invariants().unwrap();
    }

    #[test]
    fn touch_protects_entry_within_bucket() {
        let mut ranks = RankBuckets::new();
        let a = ranks.insert('a', 3);
        ranks.insert('b', 3);
        assert!(ranks.touch(a));
        assert_eq!(ranks.pop_min(), Some(('b', 3)));
        assert_eq!(ranks.pop_min(), Some(('a', 3)));
    }

    #[test]
    fn set_rank_moves_between_buckets() {
        let mut ranks = RankBuckets::new();
        let a = ranks.insert('a', 1);
        let b = ranks.insert('b', 4);

        assert_eq!(ranks.set_rank(a, 4), Some(1));
        assert_eq!(ranks.bucket_count(), 1);
        assert_eq!(ranks.bucket_len(4), 2);
        assert_eq!(ranks.rank(a), Some(4));
        // a joined the front of bucket 4, so b is the victim
        assert_eq!(ranks.peek_min(), Some((&'b', 4)));
        ranks.check_invariants().unwrap();

        assert_eq!(ranks.set_rank(b, 4), Some(4));
        assert_eq!(ranks.peek_min(), Some((&'a', 4)));
    }

    #[test]
    fn negative_ranks_sort_first() {
        let mut ranks = RankBuckets::new();
        ranks.insert("zero", 0);
        ranks.insert("neg", -7);
        ranks.insert("max", Rank::MAX);
        assert_eq!(ranks.min_rank(), Some(-7));
        assert_eq!(ranks.pop_min(), Some(("neg", -7)));
        assert_eq!(ranks.min_rank(), Some(0));
    }

    #[test]
    fn remove_drops_empty_bucket() {
        let mut ranks = RankBuckets::with_capacity(4);
        let a = ranks.insert(10, 8);
        let b = ranks.insert(20, 2);
        assert_eq!(ranks.remove(b), Some(20));
        assert_eq!(ranks.bucket_count(), 1);
        assert_eq!(ranks.min_rank(), Some(8));
        assert_eq!(ranks.remove(b), None);
        assert!(!ranks.touch(b));
        assert_eq!(ranks.set_rank(b, 1), None);
        assert_eq!(ranks.get(a), Some(&10));
        ranks.check_invariants().unwrap();

        ranks.clear();
        assert!(ranks.is_empty());
        assert_eq!(ranks.min_rank(), None);
        assert_eq!(ranks.len(), 0);
    }
}
