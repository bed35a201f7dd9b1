//! linked-table: a single-threaded hash table with a doubly-linked
//! traversal order, the building block for ordered maps and LRU-style
//! caches.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: give callers map semantics plus a deterministic, mutable
//!   iteration order and a cheap eviction mechanism, built in safe,
//!   verifiable layers so each piece can be reasoned about
//!   independently.
//! - Layers:
//!   - OrderList: intrusive doubly-linked list threaded through arena
//!     slots; owns only head/tail, nodes carry their own links.
//!   - BucketIndex: power-of-two bucket array of singly-linked
//!     collision chains over the same slots; placement is a mask of
//!     the cached hash.
//!   - LinkedTable<K, V, S>: public API composing the arena with both
//!     substructures; every mutation updates them together.
//!
//! Constraints
//! - Single-threaded: no internal locking; `&mut self` on every
//!   mutation is the synchronization contract.
//! - One allocation pool: entries live in a `SlotMap` arena and are
//!   referenced by generational key from both substructures; there is
//!   no per-entry heap node and each entry is destroyed exactly once.
//! - Keys and values are owned by move and never cloned; `Drop` is the
//!   only lifecycle hook and runs once per key/value when the entry is
//!   destroyed (remove, eviction, clear, table drop).
//!
//! Ordering invariants
//! - The order list threads every live entry exactly once. Head is
//!   oldest, tail is newest. Insert appends; in access mode a hit via
//!   `get`/`get_mut` relinks the entry at the tail. Resize and value
//!   replacement never reorder.
//! - Bulk destruction (`clear`, dropping the table) walks the order
//!   list head to tail, so destructor side effects observe the
//!   traversal order, not bucket or slot order.
//!
//! Hasher and rehashing invariants
//! - Each entry caches its `u64` hash; chain walks compare cached
//!   hashes before keys and rehashing reuses the cache, so `K: Hash`
//!   is never invoked after insertion.
//! - Capacity is always a power of two (floor 8); the resize threshold
//!   is `capacity * max_load_factor` and growth doubles capacity as
//!   soon as the threshold is reached.
//!
//! Eviction
//! - An optional hook runs after each new-key insert with the entry
//!   count and answers with how many of the oldest entries to remove.
//!   It is a plain closure with no reference to the table, so it
//!   cannot reenter.
//!
//! Notes and non-goals
//! - Not thread-safe by design; wrap externally if shared.
//! - No persistence or serialization.
//! - Iterators borrow the table, so structural mutation during an
//!   in-progress traversal is a compile error rather than a documented
//!   hazard.
//! - Allocation failure is recoverable only on the explicit `resize`
//!   path; automatic growth inside `insert` is best-effort and a
//!   refused grow leaves the table valid but over its threshold.

mod bucket_index;
mod linked_table;
mod linked_table_proptest;
mod order_list;

pub mod hashers;

// Public surface
pub use linked_table::{EvictorFn, Iter, LinkedTable, Order, TableConfig};
