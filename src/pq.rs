//! Bucket-keyed priority queue for maximum-adjacency search
//!
//! Keys are bounded integers inside an explicit [`KeyRange`], which maps each
//! key to a bucket for O(1)-amortized extraction. The bound is computed once
//! from the graph the search runs on; admissible keys never leave it, so no
//! arithmetic relies on overflow behavior.
//!
//! Misuse (extracting from an empty queue, changing the key of an absent id,
//! inserting a duplicate id or an out-of-range key) is a programming error
//! and fails fast with a panic.

use crate::graph::{Graph, NodeId};

/// Inclusive bounds for admissible queue keys.
///
/// For maximum-adjacency search the natural bound is the maximum weighted
/// degree `d` of the graph being searched: every key is a negated
/// connection weight in `[-d, 0]`, plus the positive bound reserved as the
/// not-yet-connected sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    min: i64,
    max: i64,
}

impl KeyRange {
    /// Create a range with the given inclusive bounds.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn new(min: i64, max: i64) -> Self {
        assert!(min <= max, "KeyRange: min {min} exceeds max {max}");
        Self { min, max }
    }

    /// Symmetric range `[-d, +d]` from the graph's maximum weighted degree.
    pub fn from_graph(graph: &Graph) -> Self {
        let bound = graph.max_weighted_degree().ceil() as i64;
        Self::new(-bound, bound)
    }

    /// Smallest admissible key.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Largest admissible key.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Whether `key` lies inside the range.
    pub fn contains(&self, key: i64) -> bool {
        self.min <= key && key <= self.max
    }

    /// Number of distinct admissible keys.
    pub fn span(&self) -> usize {
        (self.max - self.min + 1) as usize
    }
}

/// Bucket-keyed priority queue over node ids below a fixed capacity.
///
/// Supports insert, extract-min and change-key (increase or decrease), each
/// O(1) amortized thanks to bucket indexing over the bounded [`KeyRange`].
#[derive(Debug)]
pub struct BucketQueue {
    range: KeyRange,
    /// One bucket of ids per admissible key.
    buckets: Vec<Vec<NodeId>>,
    /// Current key per id; `None` when the id is not queued.
    keys: Vec<Option<i64>>,
    /// Position of each queued id inside its bucket.
    slots: Vec<usize>,
    /// Lowest bucket that may be nonempty.
    cursor: usize,
    len: usize,
}

impl BucketQueue {
    /// Create an empty queue accepting ids in `[0, capacity)` and keys in
    /// `range`.
    pub fn new(capacity: usize, range: KeyRange) -> Self {
        let span = range.span();
        Self {
            range,
            buckets: vec![Vec::new(); span],
            keys: vec![None; capacity],
            slots: vec![0; capacity],
            cursor: span,
            len: 0,
        }
    }

    /// Number of queued ids.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `id` is currently queued.
    pub fn contains(&self, id: NodeId) -> bool {
        id < self.keys.len() && self.keys[id].is_some()
    }

    /// Current key of a queued id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not queued.
    pub fn key_of(&self, id: NodeId) -> i64 {
        self.keys[id]
            .unwrap_or_else(|| panic!("key_of: id {id} is not queued"))
    }

    /// Queue `id` with the given key.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of capacity, already queued, or `key` is outside
    /// the admissible range.
    pub fn insert(&mut self, key: i64, id: NodeId) {
        assert!(id < self.keys.len(), "insert: id {id} exceeds capacity");
        assert!(self.keys[id].is_none(), "insert: id {id} is already queued");
        assert!(
            self.range.contains(key),
            "insert: key {key} outside [{}, {}]",
            self.range.min(),
            self.range.max()
        );

        let b = self.bucket_index(key);
        self.slots[id] = self.buckets[b].len();
        self.buckets[b].push(id);
        self.keys[id] = Some(key);
        if b < self.cursor {
            self.cursor = b;
        }
        self.len += 1;
    }

    /// Remove and return a `(key, id)` pair with the minimum key.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty.
    pub fn extract_min(&mut self) -> (i64, NodeId) {
        assert!(self.len > 0, "extract_min: queue is empty");
        while self.buckets[self.cursor].is_empty() {
            self.cursor += 1;
        }
        let id = self.buckets[self.cursor].pop().expect("cursor bucket nonempty");
        let key = self.range.min() + self.cursor as i64;
        self.keys[id] = None;
        self.len -= 1;
        (key, id)
    }

    /// Move a queued id to a new key; increases and decreases both work.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not queued or `new_key` is outside the admissible
    /// range.
    pub fn change_key(&mut self, new_key: i64, id: NodeId) {
        assert!(self.contains(id), "change_key: id {id} is not queued");
        self.detach(id);
        self.insert(new_key, id);
    }

    /// Drop all queued ids, keeping capacity and range.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.keys.fill(None);
        self.cursor = self.buckets.len();
        self.len = 0;
    }

    fn bucket_index(&self, key: i64) -> usize {
        (key - self.range.min()) as usize
    }

    /// Unlink `id` from its bucket, fixing the slot of the displaced id.
    fn detach(&mut self, id: NodeId) {
        let key = self.keys[id].expect("detach: id queued");
        let b = self.bucket_index(key);
        let slot = self.slots[id];
        self.buckets[b].swap_remove(slot);
        if let Some(&moved) = self.buckets[b].get(slot) {
            self.slots[moved] = slot;
        }
        self.keys[id] = None;
        self.len -= 1;
    }
}
