//! LinkedTable: hash index plus intrusive traversal order over one arena.

use crate::bucket_index::{BucketIndex, Chained};
use crate::order_list::{OrderLinks, OrderList, Ordered};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;
use std::collections::TryReserveError;

const MIN_CAPACITY: usize = 8;
const MAX_CAPACITY: usize = 1 << 30;
const DEFAULT_LOAD_FACTOR: f64 = 0.75;

fn clamp_capacity(requested: usize) -> usize {
    requested.clamp(MIN_CAPACITY, MAX_CAPACITY).next_power_of_two()
}

fn clamp_load_factor(requested: f64) -> f64 {
    // Non-positive (and NaN) requests select the default.
    if requested > 0.0 {
        requested.min(1.0)
    } else {
        DEFAULT_LOAD_FACTOR
    }
}

fn resize_threshold(capacity: usize, max_load_factor: f64) -> usize {
    (capacity as f64 * max_load_factor + 0.5) as usize
}

/// Iteration order maintained by the table.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Order {
    /// Entries keep the position of their first insert.
    #[default]
    Insertion,
    /// A hit through `get`/`get_mut` moves the entry to the
    /// most-recently-used end.
    Access,
}

/// Eviction policy hook: receives the entry count after a new key was
/// inserted and returns how many of the oldest entries to remove.
pub type EvictorFn = Box<dyn FnMut(usize) -> usize>;

/// Construction-time settings for [`LinkedTable`].
pub struct TableConfig {
    /// Rounded up to the next power of two, floor 8, cap 2^30.
    pub initial_capacity: usize,
    /// Resize threshold as a ratio; non-positive selects the 0.75
    /// default, values above 1.0 are clamped to 1.0.
    pub max_load_factor: f64,
    /// Grow (and rehash) automatically when the threshold is reached.
    pub auto_resize: bool,
    pub order: Order,
    pub evictor: Option<EvictorFn>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: MIN_CAPACITY,
            max_load_factor: DEFAULT_LOAD_FACTOR,
            auto_resize: true,
            order: Order::Insertion,
            evictor: None,
        }
    }
}

impl TableConfig {
    /// Attach an eviction hook.
    pub fn evict_with<F>(mut self, evictor: F) -> Self
    where
        F: FnMut(usize) -> usize + 'static,
    {
        self.evictor = Some(Box::new(evictor));
        self
    }
}

impl fmt::Debug for TableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableConfig")
            .field("initial_capacity", &self.initial_capacity)
            .field("max_load_factor", &self.max_load_factor)
            .field("auto_resize", &self.auto_resize)
            .field("order", &self.order)
            .field("evictor", &self.evictor.is_some())
            .finish()
    }
}

struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    chain: Option<DefaultKey>,
    links: OrderLinks,
}

impl<K, V> Ordered for Entry<K, V> {
    fn links(&self) -> OrderLinks {
        self.links
    }
    fn links_mut(&mut self) -> &mut OrderLinks {
        &mut self.links
    }
}

impl<K, V> Chained for Entry<K, V> {
    fn hash(&self) -> u64 {
        self.hash
    }
    fn chain(&self) -> Option<DefaultKey> {
        self.chain
    }
    fn set_chain(&mut self, next: Option<DefaultKey>) {
        self.chain = next;
    }
}

/// A hash table whose entries are additionally threaded on a doubly
/// linked list fixing the iteration order: insertion order, or
/// most-recently-used order in [`Order::Access`] mode.
///
/// Keys hash once, at insert; the cached hash drives every later chain
/// walk and rehash, so `K: Hash` is never invoked after insertion.
pub struct LinkedTable<K, V, S = RandomState> {
    hasher: S,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    index: BucketIndex,
    order: OrderList,
    max_load_factor: f64,
    threshold: usize,
    auto_resize: bool,
    access_order: bool,
    evictor: Option<EvictorFn>,
}

impl<K, V> LinkedTable<K, V> {
    /// A table with default settings: capacity 8, load factor 0.75,
    /// auto-resize on, insertion order, no evictor.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }
}

impl<K, V> Default for LinkedTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> LinkedTable<K, V, S> {
    pub fn with_config(config: TableConfig) -> Self
    where
        S: Default,
    {
        Self::with_config_and_hasher(config, S::default())
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Self {
        let capacity = clamp_capacity(config.initial_capacity);
        let max_load_factor = clamp_load_factor(config.max_load_factor);
        Self {
            hasher,
            slots: SlotMap::with_key(),
            index: BucketIndex::with_capacity(capacity),
            order: OrderList::new(),
            max_load_factor,
            threshold: resize_threshold(capacity, max_load_factor),
            auto_resize: config.auto_resize,
            access_order: config.order == Order::Access,
            evictor: config.evictor,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current bucket count; always a power of two.
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Exactly `len() / capacity()`.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn order(&self) -> Order {
        if self.access_order {
            Order::Access
        } else {
            Order::Insertion
        }
    }

    /// The entry at the least-recently-inserted (or, in access mode,
    /// least-recently-used) end.
    pub fn oldest(&self) -> Option<(&K, &V)> {
        let node = self.order.head()?;
        let entry = &self.slots[node];
        Some((&entry.key, &entry.value))
    }

    pub fn newest(&self) -> Option<(&K, &V)> {
        let node = self.order.tail()?;
        let entry = &self.slots[node];
        Some((&entry.key, &entry.value))
    }

    /// Remove and return the entry at the oldest end.
    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        let node = self.order.head()?;
        self.index.remove(&mut self.slots, node);
        self.order.unlink(&mut self.slots, node);
        let entry = self.slots.remove(node)?;
        Some((entry.key, entry.value))
    }

    /// Destroy every entry, oldest first. Keys and values are dropped
    /// in traversal order, so destructors with side effects observe a
    /// deterministic sequence.
    pub fn clear(&mut self) {
        let mut cur = self.order.head();
        while let Some(node) = cur {
            cur = self.slots[node].links.next;
            self.slots.remove(node);
        }
        self.order.reset();
        self.index.clear();
    }

    /// Grow the bucket array to at least `new_capacity` buckets
    /// (rounded up to a power of two) and rehash.
    ///
    /// Entries are relinked in traversal order using their cached
    /// hashes; the order list itself is never touched, so iteration
    /// order is identical before and after. Requests at or below the
    /// current capacity succeed without doing anything; the table never
    /// shrinks. On allocation failure the table is left exactly as it
    /// was.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        let new_capacity = clamp_capacity(new_capacity);
        if new_capacity <= self.index.capacity() {
            return Ok(());
        }
        let mut index = BucketIndex::try_with_capacity(new_capacity)?;
        let mut cur = self.order.head();
        while let Some(node) = cur {
            cur = self.slots[node].links.next;
            index.push_front(&mut self.slots, node);
        }
        self.index = index;
        self.threshold = resize_threshold(new_capacity, self.max_load_factor);
        Ok(())
    }

    /// Visit entries in traversal order until `f` returns false.
    /// Returns the number of entries visited, counting the one that
    /// stopped the walk.
    pub fn apply<F>(&self, mut f: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut applied = 0;
        let mut cur = self.order.head();
        while let Some(node) = cur {
            let entry = &self.slots[node];
            applied += 1;
            if !f(&entry.key, &entry.value) {
                break;
            }
            cur = entry.links.next;
        }
        applied
    }

    /// Visit every entry in traversal order with mutable access to the
    /// value. Does not record accesses.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        let mut cur = self.order.head();
        while let Some(node) = cur {
            let entry = &mut self.slots[node];
            f(&entry.key, &mut entry.value);
            cur = entry.links.next;
        }
    }

    /// Iterate entries in current traversal order. `.rev()` walks the
    /// same sequence backwards.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            front: self.order.head(),
            back: self.order.tail(),
            remaining: self.slots.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    fn run_evictor(&mut self) {
        let Some(mut evictor) = self.evictor.take() else {
            return;
        };
        let requested = evictor(self.slots.len());
        self.evictor = Some(evictor);
        for _ in 0..requested {
            if self.pop_oldest().is_none() {
                break;
            }
        }
    }
}

impl<K, V, S> LinkedTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn find_node<Q>(&self, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(q);
        self.index.find(&self.slots, hash, |e| e.key.borrow() == q)
    }

    /// Insert a `key` to `value` mapping.
    ///
    /// If the key is already present the value is replaced in place and
    /// the previous value is returned; the entry keeps its traversal
    /// position and neither the evictor nor the resize check runs.
    /// Disposing of the returned value is the caller's responsibility.
    ///
    /// A new key is appended at the newest end. Afterwards the evictor
    /// (if any) may trim the oldest entries, and then, with auto-resize
    /// on, the table doubles its capacity once the load factor reaches
    /// the configured maximum. A failed automatic grow is swallowed:
    /// the insert still succeeds and the table stays valid, merely over
    /// its threshold until a later grow succeeds.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hasher.hash_one(&key);
        if let Some(node) = self.index.find(&self.slots, hash, |e| e.key == key) {
            return Some(mem::replace(&mut self.slots[node].value, value));
        }

        let node = self.slots.insert(Entry {
            key,
            value,
            hash,
            chain: None,
            links: OrderLinks::default(),
        });
        self.index.push_front(&mut self.slots, node);
        self.order.push_back(&mut self.slots, node);

        self.run_evictor();
        if self.auto_resize && self.slots.len() >= self.threshold {
            let _ = self.resize(self.capacity() * 2);
        }
        None
    }

    /// Look the key up. In access mode a hit moves the entry to the
    /// most-recently-used end; the bucket position is unchanged.
    pub fn get<Q>(&mut self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find_node(q)?;
        if self.access_order {
            self.order.move_to_back(&mut self.slots, node);
        }
        Some(&self.slots[node].value)
    }

    /// Like [`get`](Self::get), with mutable access. Counts as an
    /// access in access mode.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find_node(q)?;
        if self.access_order {
            self.order.move_to_back(&mut self.slots, node);
        }
        Some(&mut self.slots[node].value)
    }

    /// Look the key up without recording an access.
    pub fn peek<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find_node(q)?;
        Some(&self.slots[node].value)
    }

    /// Containment probe; never records an access.
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_node(q).is_some()
    }

    /// Remove the key, returning the owned pair if it was present.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find_node(q)?;
        self.index.remove(&mut self.slots, node);
        self.order.unlink(&mut self.slots, node);
        let entry = self.slots.remove(node)?;
        Some((entry.key, entry.value))
    }
}

impl<K, V, S> Drop for LinkedTable<K, V, S> {
    fn drop(&mut self) {
        // The arena would drop entries in slot order; route through
        // clear() so destruction order is the traversal order.
        self.clear();
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LinkedTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Cursor pair over the traversal order. Holding one borrows the
/// table, so structural mutation during iteration cannot compile.
pub struct Iter<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        let entry = &self.slots[node];
        self.front = entry.links.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        let entry = &self.slots[node];
        self.back = entry.links.prev;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> core::iter::FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a LinkedTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl<K, V, S> LinkedTable<K, V, S> {
    /// Structural consistency: the order list and the bucket chains
    /// must agree on exactly the set of live entries.
    pub(crate) fn assert_invariants(&self) {
        assert!(self.capacity().is_power_of_two());
        assert_eq!(self.threshold, resize_threshold(self.capacity(), self.max_load_factor));

        let mut forward = 0usize;
        let mut prev = None;
        let mut cur = self.order.head();
        while let Some(node) = cur {
            assert_eq!(self.slots[node].links.prev, prev, "prev link mismatch");
            assert!(
                self.index.contains_node(&self.slots, node),
                "entry missing from its bucket chain"
            );
            forward += 1;
            prev = Some(node);
            cur = self.slots[node].links.next;
        }
        assert_eq!(self.order.tail(), prev, "tail does not close the list");
        assert_eq!(forward, self.slots.len(), "order list skips or repeats entries");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashers::SpreadState;

    fn table(order: Order) -> LinkedTable<i32, i32, SpreadState> {
        LinkedTable::with_config(TableConfig {
            order,
            ..TableConfig::default()
        })
    }

    fn key_seq<S>(t: &LinkedTable<i32, i32, S>) -> Vec<i32> {
        t.iter().map(|(k, _)| *k).collect()
    }

    /// Invariant: a new key lands at the newest end; a duplicate insert
    /// replaces in place, returns the old value, and moves nothing.
    #[test]
    fn insert_appends_and_replaces() {
        let mut t = table(Order::Insertion);
        assert_eq!(t.insert(1, 10), None);
        assert_eq!(t.insert(2, 20), None);
        assert_eq!(t.insert(3, 30), None);
        assert_eq!(key_seq(&t), vec![1, 2, 3]);

        assert_eq!(t.insert(1, 11), Some(10));
        assert_eq!(t.len(), 3);
        assert_eq!(key_seq(&t), vec![1, 2, 3]);
        assert_eq!(t.peek(&1), Some(&11));
        t.assert_invariants();
    }

    /// Invariant: in access mode only get/get_mut reorder; peek and
    /// contains_key never do.
    #[test]
    fn access_order_moves_on_get_only() {
        let mut t = table(Order::Access);
        for k in [1, 2, 3] {
            t.insert(k, k * 10);
        }
        assert_eq!(t.peek(&1), Some(&10));
        assert!(t.contains_key(&1));
        assert_eq!(key_seq(&t), vec![1, 2, 3]);

        assert_eq!(t.get(&1), Some(&10));
        assert_eq!(key_seq(&t), vec![2, 3, 1]);

        *t.get_mut(&2).unwrap() += 1;
        assert_eq!(key_seq(&t), vec![3, 1, 2]);
        t.assert_invariants();
    }

    /// Invariant: insertion mode records no accesses at all.
    #[test]
    fn insertion_order_ignores_gets() {
        let mut t = table(Order::Insertion);
        for k in [1, 2, 3] {
            t.insert(k, k);
        }
        t.get(&1);
        t.get_mut(&2);
        assert_eq!(key_seq(&t), vec![1, 2, 3]);
    }

    /// Invariant: remove unlinks from both structures and hands the
    /// pair back; a second remove misses.
    #[test]
    fn remove_returns_pair() {
        let mut t = table(Order::Insertion);
        for k in [1, 2, 3] {
            t.insert(k, k * 10);
        }
        assert_eq!(t.remove(&2), Some((2, 20)));
        assert_eq!(t.remove(&2), None);
        assert_eq!(t.len(), 2);
        assert_eq!(key_seq(&t), vec![1, 3]);
        t.assert_invariants();
    }

    /// Invariant: the resize threshold is crossed exactly when
    /// len reaches capacity * max_load_factor, and growth preserves
    /// every mapping and the traversal order.
    #[test]
    fn auto_resize_at_threshold() {
        let mut t = table(Order::Insertion);
        assert_eq!(t.capacity(), 8);
        for k in 1..=5 {
            t.insert(k, k);
        }
        assert_eq!(t.capacity(), 8);
        t.insert(6, 6); // 6/8 == 0.75 -> grow
        assert_eq!(t.capacity(), 16);
        t.insert(7, 7);
        assert_eq!(t.capacity(), 16);
        assert_eq!(t.len(), 7);
        assert_eq!(key_seq(&t), (1..=7).collect::<Vec<_>>());
        for k in 1..=7 {
            assert_eq!(t.peek(&k), Some(&k));
        }
        t.assert_invariants();
    }

    /// Invariant: with auto_resize off the table stays at its capacity
    /// and keeps absorbing entries beyond the threshold.
    #[test]
    fn no_auto_resize_when_disabled() {
        let mut t: LinkedTable<i32, i32, SpreadState> = LinkedTable::with_config(TableConfig {
            auto_resize: false,
            ..TableConfig::default()
        });
        for k in 0..32 {
            t.insert(k, k);
        }
        assert_eq!(t.capacity(), 8);
        assert_eq!(t.len(), 32);
        assert!(t.load_factor() > t.max_load_factor());
        for k in 0..32 {
            assert_eq!(t.peek(&k), Some(&k));
        }
        t.assert_invariants();
    }

    /// Invariant: explicit resize rounds up to a power of two and
    /// refuses to shrink (silently succeeding).
    #[test]
    fn resize_rounds_and_never_shrinks() {
        let mut t = table(Order::Insertion);
        for k in 0..4 {
            t.insert(k, k);
        }
        t.resize(33).unwrap();
        assert_eq!(t.capacity(), 64);
        t.resize(2).unwrap();
        assert_eq!(t.capacity(), 64);
        assert_eq!(key_seq(&t), vec![0, 1, 2, 3]);
        t.assert_invariants();
    }

    /// Invariant: construction clamps degenerate configuration values.
    #[test]
    fn config_clamps() {
        let t: LinkedTable<i32, i32, SpreadState> = LinkedTable::with_config(TableConfig {
            initial_capacity: 0,
            max_load_factor: -1.0,
            ..TableConfig::default()
        });
        assert_eq!(t.capacity(), 8);
        assert_eq!(t.max_load_factor(), 0.75);

        let t: LinkedTable<i32, i32, SpreadState> = LinkedTable::with_config(TableConfig {
            initial_capacity: 9,
            max_load_factor: 7.5,
            ..TableConfig::default()
        });
        assert_eq!(t.capacity(), 16);
        assert_eq!(t.max_load_factor(), 1.0);
    }

    /// Invariant: the evictor sees the post-insert count and trims from
    /// the oldest end; replacement inserts never trigger it.
    #[test]
    fn evictor_trims_oldest() {
        let mut t: LinkedTable<i32, i32, SpreadState> =
            LinkedTable::with_config(TableConfig::default().evict_with(|n| usize::from(n > 3)));
        for k in 1..=5 {
            t.insert(k, k);
        }
        assert_eq!(t.len(), 3);
        assert_eq!(key_seq(&t), vec![3, 4, 5]);
        assert!(!t.contains_key(&1));
        assert!(!t.contains_key(&2));

        // Replacing an existing key must not evict.
        t.insert(3, 33);
        assert_eq!(t.len(), 3);
        assert_eq!(key_seq(&t), vec![3, 4, 5]);
        t.assert_invariants();
    }

    /// Invariant: an evictor demanding more than len empties the table
    /// and stops cleanly.
    #[test]
    fn evictor_overshoot_clamps() {
        let mut t: LinkedTable<i32, i32, SpreadState> =
            LinkedTable::with_config(TableConfig::default().evict_with(|_| usize::MAX));
        t.insert(1, 1);
        assert!(t.is_empty());
        t.assert_invariants();
    }

    /// Invariant: apply walks in order, stops on false, and counts the
    /// stopping entry.
    #[test]
    fn apply_stops_early() {
        let mut t = table(Order::Insertion);
        for k in 1..=4 {
            t.insert(k, k);
        }
        let mut seen = Vec::new();
        let applied = t.apply(|k, _| {
            seen.push(*k);
            *k != 3
        });
        assert_eq!(applied, 3);
        assert_eq!(seen, vec![1, 2, 3]);

        let all = t.apply(|_, _| true);
        assert_eq!(all, 4);
    }

    /// Invariant: for_each_mut visits in order and its writes are
    /// visible to later lookups.
    #[test]
    fn for_each_mut_updates() {
        let mut t = table(Order::Insertion);
        for k in 1..=3 {
            t.insert(k, k);
        }
        let mut visited = Vec::new();
        t.for_each_mut(|k, v| {
            visited.push(*k);
            *v *= 10;
        });
        assert_eq!(visited, vec![1, 2, 3]);
        assert_eq!(t.peek(&2), Some(&20));
    }

    /// Invariant: forward and backward iteration are exact reverses and
    /// the iterator is exact-sized from both ends.
    #[test]
    fn iteration_both_directions() {
        let mut t = table(Order::Insertion);
        for k in 1..=4 {
            t.insert(k, k);
        }
        let fwd: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
        let bwd: Vec<i32> = t.iter().rev().map(|(k, _)| *k).collect();
        assert_eq!(fwd, vec![1, 2, 3, 4]);
        assert_eq!(bwd, vec![4, 3, 2, 1]);
        assert_eq!(t.iter().len(), 4);

        let mut it = t.iter();
        assert_eq!(it.next().map(|(k, _)| *k), Some(1));
        assert_eq!(it.next_back().map(|(k, _)| *k), Some(4));
        assert_eq!(it.next().map(|(k, _)| *k), Some(2));
        assert_eq!(it.next_back().map(|(k, _)| *k), Some(3));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    /// Invariant: oldest/newest track the order-list ends; pop_oldest
    /// consumes from the head.
    #[test]
    fn order_end_accessors() {
        let mut t = table(Order::Insertion);
        assert_eq!(t.oldest(), None);
        for k in 1..=3 {
            t.insert(k, k * 10);
        }
        assert_eq!(t.oldest(), Some((&1, &10)));
        assert_eq!(t.newest(), Some((&3, &30)));
        assert_eq!(t.pop_oldest(), Some((1, 10)));
        assert_eq!(t.oldest(), Some((&2, &20)));
        assert_eq!(t.len(), 2);
        t.assert_invariants();
    }

    /// Invariant: clear destroys everything and the table remains
    /// usable afterwards.
    #[test]
    fn clear_then_reuse() {
        let mut t = table(Order::Insertion);
        for k in 1..=4 {
            t.insert(k, k);
        }
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.iter().next(), None);
        t.insert(9, 9);
        assert_eq!(t.peek(&9), Some(&9));
        assert_eq!(t.len(), 1);
        t.assert_invariants();
    }

    /// Invariant: collision chains resolve by equality under a
    /// constant-hash builder; removal from a shared chain keeps the
    /// other entries reachable.
    #[test]
    fn collision_chain_by_equality() {
        use core::hash::{BuildHasher, Hasher};

        #[derive(Clone, Default)]
        struct ConstBuildHasher;
        struct ConstHasher;
        impl BuildHasher for ConstBuildHasher {
            type Hasher = ConstHasher;
            fn build_hasher(&self) -> Self::Hasher {
                ConstHasher
            }
        }
        impl Hasher for ConstHasher {
            fn write(&mut self, _bytes: &[u8]) {}
            fn finish(&self) -> u64 {
                0
            }
        }

        let mut t: LinkedTable<String, i32, ConstBuildHasher> =
            LinkedTable::with_config(TableConfig::default());
        t.insert("a".to_string(), 1);
        t.insert("b".to_string(), 2);
        t.insert("c".to_string(), 3);
        assert_eq!(t.peek("b"), Some(&2));
        assert_eq!(t.remove("b"), Some(("b".to_string(), 2)));
        assert_eq!(t.peek("a"), Some(&1));
        assert_eq!(t.peek("c"), Some(&3));
        t.assert_invariants();
    }

    /// Invariant: borrowed lookups work (store String, query &str).
    #[test]
    fn borrowed_lookup() {
        let mut t: LinkedTable<String, i32> = LinkedTable::new();
        t.insert("hello".to_string(), 1);
        assert_eq!(t.peek("hello"), Some(&1));
        assert!(t.contains_key("hello"));
        assert_eq!(t.remove("hello"), Some(("hello".to_string(), 1)));
    }

    /// Invariant: load_factor is exactly len/capacity at every step.
    #[test]
    fn load_factor_exact() {
        let mut t = table(Order::Insertion);
        for k in 0..20 {
            t.insert(k, k);
            assert_eq!(t.load_factor(), t.len() as f64 / t.capacity() as f64);
        }
        t.remove(&0);
        assert_eq!(t.load_factor(), t.len() as f64 / t.capacity() as f64);
    }
}
