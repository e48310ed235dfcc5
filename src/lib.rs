//! linked-hashmap: insertion-ordered hash containers with O(1) relinking.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: combine hash-table lookup with a stable, observable iteration
//!   order, built in safe, verifiable layers so each piece can be reasoned
//!   about independently.
//! - Layers:
//!   - LinkedHashMap<K, V, S>: structural core. A `hashbrown::HashTable`
//!     index maps key hashes to slots in a `slotmap::SlotMap`; a doubly
//!     linked list is threaded through the slots via `prev`/`next` slot
//!     keys, with `head`/`tail` bounding the walk. Exposes the primitive
//!     mutation surface: insert, remove, clear, and the relinking
//!     operations (`move_to_front`, `move_to_back`, `move_before`,
//!     `move_after`).
//!   - Iterators and cursors: borrow-checked iterators (`iter`, `iter_mut`,
//!     `into_iter`) walk the links under the usual borrow rules; detached
//!     `Cursor`/`ReverseCursor` walkers capture the container's
//!     `(era, version)` pair and fail fast with `Invalidated` if the
//!     container mutates underneath them.
//!   - LinkedHashSet<T, S>: the value-only twin, a thin wrapper over
//!     `LinkedHashMap<T, ()>`.
//!   - LruMap<K, V, S>: a policy overlay composing the core's relinking
//!     primitives into touch-on-access eviction order. It never duplicates
//!     index/link/version bookkeeping.
//!
//! Constraints
//! - Single-threaded use; no internal synchronization.
//! - Stable, generational node handles (`NodeRef`) whose lifetime is
//!   independent of the container: a handle to a removed entry, or any
//!   handle from before a `clear()`, consistently reports absence.
//! - O(1) average lookups with unique keys; duplicate inserts fail.
//! - Each entry stores a precomputed `u64` hash and indexing always uses
//!   the stored hash; `K: Hash` is never invoked after insertion.
//!
//! Handle invalidation
//! - Per-node: `slotmap`'s generational keys make a handle stale the moment
//!   its entry is removed, even if the physical slot is reused.
//! - Bulk: the container carries an `era` minted from a global monotonic
//!   counter and stamped into every handle and cursor. `clear()` mints a
//!   fresh era, so one word write invalidates every outstanding handle
//!   without visiting them; because eras are globally unique, the same
//!   comparison rejects handles that belong to a different map.
//!
//! Versioning
//! - Every structural mutation (insert, remove, clear, relink) and every
//!   value overwrite bumps a `u64` version counter. Cursors compare their
//!   captured version on every access and report `Invalidated` on any
//!   divergence, never a torn walk.
//!
//! Why this split?
//! - Localize invariants: the list/index duality lives in exactly one
//!   module; wrappers get it for free.
//! - Minimize unsafe: the only unsafe code is the mutable ordered iterator;
//!   everything else is safe slot-key manipulation.
//! - Clear failure boundaries: lookups are pure; mutations either complete
//!   or reject before touching anything.
//!
//! Notes and non-goals
//! - Not a concurrent structure; wrap it in a lock for shared use.
//! - No persistence or serialization formats.
//! - Keys are immutable post-insert; there is no `key_mut`.
//!
//! # Examples
//!
//! ```
//! use linked_hashmap::LinkedHashMap;
//!
//! let mut map = LinkedHashMap::new();
//! map.insert("a", 1);
//! map.insert("b", 2);
//! map.insert("c", 3);
//! map.remove(&"b");
//!
//! let keys: Vec<_> = map.keys().copied().collect();
//! assert_eq!(keys, ["a", "c"]);
//! ```

pub mod cursor;
pub mod iter;
pub mod linked_hash_map;
mod linked_hash_map_proptest;
pub mod linked_hash_set;
pub mod lru;

// Public surface
pub use cursor::{Cursor, Invalidated, ReverseCursor};
pub use iter::{IntoIter, Iter, IterMut};
pub use linked_hash_map::{CapacityError, InsertError, LinkedHashMap, NodeRef};
pub use linked_hash_set::{LinkedHashSet, SetCursor, SetReverseCursor};
pub use lru::LruMap;
