//! Hashers and key adapters for common key shapes.
//!
//! [`LinkedTable`](crate::LinkedTable) works with any `BuildHasher`;
//! these are the two collaborators callers tend to need beyond the std
//! default: a deterministic hasher for integer-like keys, and a key
//! adapter for identity (by-address) keying.

use core::hash::{BuildHasher, Hash, Hasher};

/// Builds [`SpreadHasher`]s. Deterministic across runs and instances,
/// which also makes it the hasher of choice for tests that assert on
/// bucket placement.
#[derive(Copy, Clone, Debug, Default)]
pub struct SpreadState;

impl BuildHasher for SpreadState {
    type Hasher = SpreadHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SpreadHasher(0)
    }
}

/// Accumulates written bytes by rotate-and-xor and finishes with a bit
/// spreader (the supplemental hash of older `java.util.HashMap`s).
/// The spread step matters because the table selects buckets by masking
/// the low-order bits.
///
/// Not a quality hash for adversarial inputs; meant for integer-like
/// keys where determinism beats DoS resistance.
pub struct SpreadHasher(u64);

impl Hasher for SpreadHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(b);
        }
    }

    fn finish(&self) -> u64 {
        let mut h = self.0;
        h ^= (h >> 20) ^ (h >> 12);
        h ^ (h >> 7) ^ (h >> 4)
    }
}

/// Key adapter that hashes and compares by reference identity rather
/// than by value. Two `ByAddress` keys are equal only when they point
/// at the same object.
pub struct ByAddress<'a, T>(pub &'a T);

impl<T> Copy for ByAddress<'_, T> {}

impl<T> Clone for ByAddress<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for ByAddress<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

impl<T> Eq for ByAddress<'_, T> {}

impl<T> Hash for ByAddress<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 as *const T as usize).hash(state);
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for ByAddress<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ByAddress").field(&self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: equal inputs hash equal, distinct small integers
    /// spread into distinct hashes.
    #[test]
    fn spread_is_deterministic() {
        let s = SpreadState;
        assert_eq!(s.hash_one(42u32), s.hash_one(42u32));
        let hashes: Vec<u64> = (0u32..64).map(|k| s.hash_one(k)).collect();
        let mut deduped = hashes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), hashes.len());
    }

    /// Invariant: sequential integers do not collide under a small
    /// power-of-two mask once spread.
    #[test]
    fn spread_fills_low_bits() {
        let s = SpreadState;
        let mut buckets: Vec<u64> = (0u32..8).map(|k| s.hash_one(k) & 7).collect();
        buckets.sort_unstable();
        buckets.dedup();
        assert!(buckets.len() > 4, "low bits barely vary: {buckets:?}");
    }

    /// Invariant: ByAddress equality is identity, not value equality.
    #[test]
    fn by_address_identity() {
        let a = 7;
        let b = 7;
        assert_eq!(ByAddress(&a), ByAddress(&a));
        assert_ne!(ByAddress(&a), ByAddress(&b));

        let s = SpreadState;
        assert_eq!(s.hash_one(ByAddress(&a)), s.hash_one(ByAddress(&a)));
    }

    /// Invariant: ByAddress works as a table key.
    #[test]
    fn by_address_as_key() {
        use crate::{LinkedTable, TableConfig};

        let first = "first".to_string();
        let second = "second".to_string();
        let mut t: LinkedTable<ByAddress<'_, String>, i32, SpreadState> =
            LinkedTable::with_config(TableConfig::default());
        t.insert(ByAddress(&first), 1);
        t.insert(ByAddress(&second), 2);
        assert_eq!(t.peek(&ByAddress(&first)), Some(&1));
        assert_eq!(t.remove(&ByAddress(&second)), Some((ByAddress(&second), 2)));
        assert_eq!(t.len(), 1);
    }
}
