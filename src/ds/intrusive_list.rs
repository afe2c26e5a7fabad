//! Doubly linked lists threaded through a `SlotArena`.
//!
//! Nodes live in a [`NodeArena`] and are linked by [`SlotId`], so splicing a
//! node out of one list and into another never moves or reallocates it. A
//! [`ListLinks`] is only the `(head, tail, len)` triple; many of them can share
//! one arena, which is how the frequency and rank buckets keep every entry of
//! a policy in a single arena while each bucket is its own list.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_0   │ { value: A, prev: None,       next: id_2 }  │  bucket 1
//!   │ id_1   │ { value: B, prev: None,       next: None }  │  bucket 2
//!   │ id_2   │ { value: C, prev: Some(id_0), next: None }  │  bucket 1
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   bucket 1: head ─► [id_0] ◄──► [id_2] ◄── tail
//!   bucket 2: head ─► [id_1] ◄── tail
//! ```
//!
//! ## Operations
//!
//! | Operation       | Time | Notes                                  |
//! |-----------------|------|----------------------------------------|
//! | `push_front`    | O(1) | node becomes the head (MRU)            |
//! | `unlink`        | O(1) | by handle, no search                   |
//! | `pop_back`      | O(1) | tail-most real node (LRU)              |
//! | `move_to_front` | O(1) | unlink + push_front                    |
//! | `len`           | O(1) | maintained incrementally               |
//!
//! [`IntrusiveList`] bundles one arena with one list for the common
//! single-list case (the LRU policy).

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// A list node: the payload plus its neighbour links.
#[derive(Debug)]
pub struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl<T> Node<T> {
    /// Creates a detached node.
    pub fn new(value: T) -> Self {
        Self {
            value,
            prev: None,
            next: None,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Arena holding the nodes of one or more lists.
pub type NodeArena<T> = SlotArena<Node<T>>;

/// Head, tail and length of one list inside a shared [`NodeArena`].
///
/// All methods take the arena explicitly. Callers must only pass ids that
/// belong to this list (or, for `push_front`, ids that are currently detached).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListLinks {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl ListLinks {
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently pushed node.
    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Least recently pushed node; the eviction end.
    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Links a detached node at the head. Returns `false` if `id` is vacant.
    pub fn push_front<T>(&mut self, arena: &mut NodeArena<T>, id: SlotId) -> bool {
        let old_head = self.head;
        match arena.get_mut(id) {
            Some(node) => {
                node.prev = None;
                node.next = old_head;
            },
            None => return false,
        }
        if let Some(head) = old_head {
            if let Some(head_node) = arena.get_mut(head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.len += 1;
        true
    }

    /// Splices `id` out of the list, leaving the node detached in the arena.
    pub fn unlink<T>(&mut self, arena: &mut NodeArena<T>, id: SlotId) -> bool {
        let (prev, next) = match arena.get(id) {
            Some(node) => (node.prev, node.next),
            None => return false,
        };

        if let Some(prev_id) = prev {
            if let Some(prev_node) = arena.get_mut(prev_id) {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_id) = next {
            if let Some(next_node) = arena.get_mut(next_id) {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
        self.len = self.len.saturating_sub(1);
        true
    }

    /// Unlinks the tail node and returns its id; the node stays in the arena.
    pub fn pop_back<T>(&mut self, arena: &mut NodeArena<T>) -> Option<SlotId> {
        let id = self.tail?;
        self.unlink(arena, id);
        Some(id)
    }

    /// Moves a member node to the head.
    pub fn move_to_front<T>(&mut self, arena: &mut NodeArena<T>, id: SlotId) -> bool {
        if !arena.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.unlink(arena, id);
        self.push_front(arena, id)
    }

    /// Iterates member ids from head (MRU) to tail (LRU).
    pub fn iter_ids<'a, T>(&self, arena: &'a NodeArena<T>) -> ListIdIter<'a, T> {
        ListIdIter {
            arena,
            current: self.head,
        }
    }

    /// Walks the list and checks link symmetry, tail and recorded length.
    pub fn check_invariants<T>(&self, arena: &NodeArena<T>) -> Result<(), InvariantError> {
        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;

        while let Some(id) = current {
            let node = arena.get(id).ok_or_else(|| {
                InvariantError::new(format!("list node {} is not in the arena", id.index()))
            })?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "list node {} has a stale prev link",
                    id.index()
                )));
            }
            count += 1;
            if count > self.len {
                return Err(InvariantError::new(
                    "list walk is longer than the recorded length",
                ));
            }
            prev = Some(id);
            current = node.next;
        }

        if self.tail != prev {
            return Err(InvariantError::new("list tail is not the last reachable node"));
        }
        if count != self.len {
            return Err(InvariantError::new(format!(
                "list length is {} but {} nodes are linked",
                self.len, count
            )));
        }
        Ok(())
    }
}

/// Iterator over list member ids, head to tail.
pub struct ListIdIter<'a, T> {
    arena: &'a NodeArena<T>,
    current: Option<SlotId>,
}

impl<T> Iterator for ListIdIter<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.arena.get(id)?.next;
        Some(id)
    }
}

/// A single list that owns its arena.
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: NodeArena<T>,
    links: ListLinks,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            links: ListLinks::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            links: ListLinks::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn front(&self) -> Option<&T> {
        self.links.front_id().and_then(|id| self.get(id))
    }

    pub fn back(&self) -> Option<&T> {
        self.links.back_id().and_then(|id| self.get(id))
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.links.front_id()
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.links.back_id()
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(Node::value)
    }

    /// Inserts `value` at the head and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node::new(value));
        self.links.push_front(&mut self.arena, id);
        id
    }

    /// Removes the node and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.links.unlink(&mut self.arena, id) {
            return None;
        }
        self.arena.remove(id).map(Node::into_value)
    }

    /// Removes and returns the tail value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.links.pop_back(&mut self.arena)?;
        self.arena.remove(id).map(Node::into_value)
    }

    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        self.links.move_to_front(&mut self.arena, id)
    }

    /// Iterates values head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.links
            .iter_ids(&self.arena)
            .filter_map(|id| self.arena.get(id).map(Node::value))
    }

    pub fn iter_ids(&self) -> ListIdIter<'_, T> {
        self.links.iter_ids(&self.arena)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.links = ListLinks::new();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.links.check_invariants(&self.arena)?;
        if self.arena.len() != self.links.len() {
            return Err(InvariantError::new(format!(
                "arena holds {} nodes but the list links {}",
                self.arena.len(),
                self.links.len()
            )));
        }
        Ok(())
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod owned_list {
        use super::*;

        #[test]
        fn push_move_remove_pop() {
            let mut list = IntrusiveList::new();
            let a = list.push_front("a");
            let b = list.push_front("b");
            let c = list.push_front("c");

            assert_eq!(list.front(), Some(&"c"));
            assert_eq!(list.back(), Some(&"a"));
            assert_eq!(list.len(), 3);

            assert!(list.move_to_front(a));
            assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "c", "b"]);

            assert_eq!(list.remove(c), Some("c"));
            assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "b"]);

            assert_eq!(list.pop_back(), Some("b"));
            assert_eq!(list.pop_back(), Some("a"));
            assert_eq!(list.pop_back(), None);
            assert!(list.is_empty());
            assert!(!list.contains(b));
            list.check_invariants().unwrap();
        }

        #[test]
        fn move_head_is_noop() {
            let mut list = IntrusiveList::new();
            list.push_front(1);
            let head = list.push_front(2);
            assert!(list.move_to_front(head));
            assert_eq!(list.iter_ids().collect::<Vec<_>>()[0], head);
            list.check_invariants().unwrap();
        }

        #[test]
        fn remove_vacant_id_is_none() {
            let mut list = IntrusiveList::new();
            let id = list.push_front(10);
            assert_eq!(list.remove(id), Some(10));
            assert_eq!(list.remove(id), None);
            assert!(!list.move_to_front(id));
            assert_eq!(list.len(), 0);
        }

        #[test]
        fn single_entry_then_clear() {
            let mut list = IntrusiveList::with_capacity(4);
            let id = list.push_front(5);
            assert_eq!(list.get(id), Some(&5));
            assert_eq!(list.front_id(), Some(id));
            assert_eq!(list.back_id(), Some(id));

            list.clear();
            assert!(list.is_empty());
            assert_eq!(list.front(), None);
            list.check_invariants().unwrap();
        }
    }

    mod shared_arena {
        use super::*;

        #[test]
        fn two_lists_share_one_arena() {
            let mut arena: NodeArena<u32> = SlotArena::new();
            let mut left = ListLinks::new();
            let mut right = ListLinks::new();

            let ids: Vec<_> = (0..4).map(|v| arena.insert(Node::new(v))).collect();
            for &id in &ids {
                left.push_front(&mut arena, id);
            }
            assert_eq!(left.len(), 4);

            // splice node 1 into the right list
            assert!(left.unlink(&mut arena, ids[1]));
            assert!(right.push_front(&mut arena, ids[1]));
            assert_eq!(left.len(), 3);
            assert_eq!(right.len(), 1);
            assert_eq!(
                left.iter_ids(&arena).collect::<Vec<_>>(),
                vec![ids[3], ids[2], ids[0]]
            );

            left.check_invariants(&arena).unwrap();
            right.check_invariants(&arena).unwrap();
        }

        #[test]
        fn pop_back_leaves_node_in_arena() {
            let mut arena: NodeArena<&str> = SlotArena::new();
            let mut list = ListLinks::new();
            let a = arena.insert(Node::new("a"));
            let b = arena.insert(Node::new("b"));
            list.push_front(&mut arena, a);
            list.push_front(&mut arena, b);

            assert_eq!(list.pop_back(&mut arena), Some(a));
            assert!(arena.contains(a));
            assert_eq!(list.front_id(), Some(b));
            assert_eq!(list.back_id(), Some(b));
            assert_eq!(list.pop_back(&mut arena), Some(b));
            assert_eq!(list.pop_back(&mut arena), None);
            assert!(list.is_empty());
        }

        #[test]
        fn push_vacant_id_is_rejected() {
            let mut arena: NodeArena<u8> = SlotArena::new();
            let mut list = ListLinks::new();
            let id = arena.insert(Node::new(1));
            arena.remove(id);
            assert!(!list.push_front(&mut arena, id));
            assert!(list.is_empty());
        }

        #[test]
        fn corrupted_length_is_reported() {
            let mut arena: NodeArena<u8> = SlotArena::new();
            let mut list = ListLinks::new();
            let id = arena.insert(Node::new(1));
            list.push_front(&mut arena, id);
            list.len = 2;
            assert!(list.check_invariants(&arena).is_err());
        }
    }
}
