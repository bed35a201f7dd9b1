//! BucketIndex: power-of-two bucket array with per-bucket collision chains.

use slotmap::{DefaultKey, SlotMap};
use std::collections::TryReserveError;

/// Contract a node type must offer so the index can chain through it.
/// The hash is cached at insert time; the index never re-hashes keys.
pub(crate) trait Chained {
    fn hash(&self) -> u64;
    fn chain(&self) -> Option<DefaultKey>;
    fn set_chain(&mut self, next: Option<DefaultKey>);
}

/// The hash index: one chain head per bucket. Capacity is always a
/// power of two so bucket selection is a mask, never a division.
#[derive(Debug)]
pub(crate) struct BucketIndex {
    heads: Vec<Option<DefaultKey>>,
}

impl BucketIndex {
    /// Infallible construction, for table creation.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            heads: vec![None; capacity],
        }
    }

    /// Fallible construction, for resize: a refused allocation must
    /// leave the caller's existing index untouched.
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        debug_assert!(capacity.is_power_of_two());
        let mut heads = Vec::new();
        heads.try_reserve_exact(capacity)?;
        heads.resize(capacity, None);
        Ok(Self { heads })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.heads.len()
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash as usize) & (self.heads.len() - 1)
    }

    /// Walk the bucket chain for `hash`, returning the first node whose
    /// cached hash matches and for which `eq` holds.
    pub(crate) fn find<T, F>(
        &self,
        slots: &SlotMap<DefaultKey, T>,
        hash: u64,
        mut eq: F,
    ) -> Option<DefaultKey>
    where
        T: Chained,
        F: FnMut(&T) -> bool,
    {
        let mut cur = self.heads[self.bucket_of(hash)];
        while let Some(node) = cur {
            let entry = &slots[node];
            if entry.hash() == hash && eq(entry) {
                return Some(node);
            }
            cur = entry.chain();
        }
        None
    }

    /// Prepend `node` to the chain its cached hash selects. The node
    /// must not already be linked into any chain.
    pub(crate) fn push_front<T: Chained>(
        &mut self,
        slots: &mut SlotMap<DefaultKey, T>,
        node: DefaultKey,
    ) {
        let bucket = self.bucket_of(slots[node].hash());
        let head = self.heads[bucket];
        slots[node].set_chain(head);
        self.heads[bucket] = Some(node);
    }

    /// Unlink `node` from its chain. The node must be present; the
    /// chain is singly linked, so this walks from the bucket head.
    pub(crate) fn remove<T: Chained>(
        &mut self,
        slots: &mut SlotMap<DefaultKey, T>,
        node: DefaultKey,
    ) {
        let bucket = self.bucket_of(slots[node].hash());
        if self.heads[bucket] == Some(node) {
            self.heads[bucket] = slots[node].chain();
            slots[node].set_chain(None);
            return;
        }
        let mut cur = self.heads[bucket];
        while let Some(prev) = cur {
            let next = slots[prev].chain();
            if next == Some(node) {
                let after = slots[node].chain();
                slots[prev].set_chain(after);
                slots[node].set_chain(None);
                return;
            }
            cur = next;
        }
        debug_assert!(false, "node missing from its bucket chain");
    }

    /// Drop every chain head. Nodes themselves are untouched; used when
    /// the caller has already destroyed (or is about to relink) them.
    pub(crate) fn clear(&mut self) {
        for head in &mut self.heads {
            *head = None;
        }
    }

    /// Chain membership check for invariant assertions.
    #[cfg(test)]
    pub(crate) fn contains_node<T: Chained>(
        &self,
        slots: &SlotMap<DefaultKey, T>,
        node: DefaultKey,
    ) -> bool {
        let mut cur = self.heads[self.bucket_of(slots[node].hash())];
        while let Some(k) = cur {
            if k == node {
                return true;
            }
            cur = slots[k].chain();
        }
        false
    }
}
