//! LinkedHashMap: structural core. A hash index over slot storage with a
//! doubly linked list threaded through the entries.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use std::collections::hash_map::RandomState;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::hash_table::Entry as IndexEntry;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};

use crate::cursor::{Cursor, ReverseCursor};
use crate::iter::{IntoIter, Iter, IterMut};

/// Mint a fresh era id. Eras are globally unique, so comparing a handle's
/// era against a map's era simultaneously detects handles from before a
/// `clear()` and handles minted by a different map.
fn next_era() -> u64 {
    static NEXT_ERA: AtomicU64 = AtomicU64::new(1);
    NEXT_ERA.fetch_add(1, Ordering::Relaxed)
}

/// A stable handle to one entry of a [`LinkedHashMap`] (or set).
///
/// Handles are generational: after the entry is removed, or after the map is
/// cleared, the handle stops resolving and every accessor returns `None`,
/// even if the underlying slot is later reused for a new entry. A handle's
/// lifetime is independent of the map's contents; holding one keeps nothing
/// alive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeRef {
    pub(crate) slot: DefaultKey,
    pub(crate) era: u64,
}

impl NodeRef {
    /// Borrow the entry's key, or `None` if the handle is stale.
    pub fn key<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<&'a K> {
        map.node_key(*self)
    }

    /// Borrow the entry's value, or `None` if the handle is stale.
    pub fn value<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<&'a V> {
        map.node_value(*self)
    }

    /// Mutably borrow the entry's value, or `None` if the handle is stale.
    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut LinkedHashMap<K, V, S>) -> Option<&'a mut V> {
        map.node_value_mut(*self)
    }
}

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    pub(crate) prev: Option<DefaultKey>,
    pub(crate) next: Option<DefaultKey>,
}

/// Error returned by the strict insertion form, [`LinkedHashMap::try_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    DuplicateKey,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("key already present"),
        }
    }
}

impl std::error::Error for InsertError {}

/// Error returned by bulk export when the destination slice is shorter than
/// the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    pub needed: usize,
    pub available: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "destination holds {} entries, {} required",
            self.available, self.needed
        )
    }
}

impl std::error::Error for CapacityError {}

/// A hash map that preserves insertion order and supports O(1) relinking.
///
/// Lookup goes through a hash index; iteration walks a doubly linked list
/// threaded through the entries. New entries link at the back; the relative
/// order only changes through the explicit `move_*` operations.
///
/// # Examples
///
/// ```
/// use linked_hashmap::LinkedHashMap;
///
/// let mut map = LinkedHashMap::new();
/// let a = map.try_insert("a", 1).unwrap();
/// map.insert("b", 2);
/// map.move_to_back(a);
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["b", "a"]);
/// ```
pub struct LinkedHashMap<K, V, S = RandomState> {
    pub(crate) hasher: S,
    pub(crate) index: HashTable<DefaultKey>,
    pub(crate) slots: SlotMap<DefaultKey, Node<K, V>>,
    pub(crate) head: Option<DefaultKey>,
    pub(crate) tail: Option<DefaultKey>,
    pub(crate) version: u64,
    pub(crate) era: u64,
}

impl<K, V> LinkedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::default())
    }

    /// Creates an empty map pre-sized for at least `capacity` entries.
    /// The capacity is a performance hint only.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::default())
    }
}

impl<K, V, S: Default> Default for LinkedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity_and_key(capacity),
            head: None,
            tail: None,
            version: 0,
            era: next_era(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// A handle is valid iff it was minted by this map's current era and its
    /// entry is still live.
    fn resolve(&self, node: NodeRef) -> Option<DefaultKey> {
        (node.era == self.era && self.slots.contains_key(node.slot)).then_some(node.slot)
    }

    fn require(&self, node: NodeRef) -> DefaultKey {
        match self.resolve(node) {
            Some(slot) => slot,
            None => panic!("node handle does not belong to this map"),
        }
    }

    /// Splice `slot` out of the list, maintaining `head`/`tail`. The node's
    /// own link fields are left for the caller to overwrite or drop.
    fn unlink(&mut self, slot: DefaultKey) {
        let (prev, next) = {
            let node = &self.slots[slot];
            (node.prev, node.next)
        };
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Link a freshly inserted `slot` (its links still unset) as the new tail.
    fn link_tail(&mut self, slot: DefaultKey) {
        match self.tail {
            Some(t) => {
                self.slots[t].next = Some(slot);
                self.slots[slot].prev = Some(t);
            }
            None => self.head = Some(slot),
        }
        self.slots[slot].next = None;
        self.tail = Some(slot);
    }

    /// Remove `slot` from the index, the list, and storage. The stored hash
    /// is used, so no user hashing code runs here.
    fn detach(&mut self, slot: DefaultKey) -> Node<K, V> {
        let hash = self.slots[slot].hash;
        match self.index.find_entry(hash, |&s| s == slot) {
            Ok(entry) => {
                entry.remove();
            }
            Err(_) => unreachable!("hash index lost a live slot"),
        }
        self.unlink(slot);
        let node = match self.slots.remove(slot) {
            Some(node) => node,
            None => unreachable!("slot vanished during detach"),
        };
        self.bump();
        node
    }

    /// Removes the entry this handle refers to, returning its key and value.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not currently belong to this map (wrong
    /// map, already removed, or from before a `clear()`). Nothing is mutated
    /// in that case.
    pub fn remove_node(&mut self, node: NodeRef) -> (K, V) {
        let slot = self.require(node);
        let node = self.detach(slot);
        (node.key, node.value)
    }

    /// Removes and returns the first entry in iteration order.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let slot = self.head?;
        let node = self.detach(slot);
        Some((node.key, node.value))
    }

    /// Removes and returns the last entry in iteration order.
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let slot = self.tail?;
        let node = self.detach(slot);
        Some((node.key, node.value))
    }

    /// Removes every entry and invalidates every outstanding handle.
    ///
    /// Handle invalidation is a single era write, independent of how many
    /// handles exist.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.head = None;
        self.tail = None;
        self.era = next_era();
        self.bump();
    }

    pub fn front(&self) -> Option<(&K, &V)> {
        let slot = self.head?;
        let node = &self.slots[slot];
        Some((&node.key, &node.value))
    }

    pub fn back(&self) -> Option<(&K, &V)> {
        let slot = self.tail?;
        let node = &self.slots[slot];
        Some((&node.key, &node.value))
    }

    pub fn front_node(&self) -> Option<NodeRef> {
        self.head.map(|slot| NodeRef { slot, era: self.era })
    }

    pub fn back_node(&self) -> Option<NodeRef> {
        self.tail.map(|slot| NodeRef { slot, era: self.era })
    }

    pub fn contains_node(&self, node: NodeRef) -> bool {
        self.resolve(node).is_some()
    }

    pub fn node_key(&self, node: NodeRef) -> Option<&K> {
        let slot = self.resolve(node)?;
        Some(&self.slots[slot].key)
    }

    pub fn node_value(&self, node: NodeRef) -> Option<&V> {
        let slot = self.resolve(node)?;
        Some(&self.slots[slot].value)
    }

    /// Overwriting through this borrow is a value-only update: it moves
    /// nothing and does not disturb cursors.
    pub fn node_value_mut(&mut self, node: NodeRef) -> Option<&mut V> {
        let slot = self.resolve(node)?;
        Some(&mut self.slots[slot].value)
    }

    pub fn node_entry(&self, node: NodeRef) -> Option<(&K, &V)> {
        let slot = self.resolve(node)?;
        let node = &self.slots[slot];
        Some((&node.key, &node.value))
    }

    /// The handle one step toward the back, or `None` at the back or on a
    /// stale handle.
    pub fn next_node(&self, node: NodeRef) -> Option<NodeRef> {
        let slot = self.resolve(node)?;
        self.slots[slot].next.map(|slot| NodeRef { slot, era: self.era })
    }

    /// The handle one step toward the front, or `None` at the front or on a
    /// stale handle.
    pub fn prev_node(&self, node: NodeRef) -> Option<NodeRef> {
        let slot = self.resolve(node)?;
        self.slots[slot].prev.map(|slot| NodeRef { slot, era: self.era })
    }

    /// Relinks the entry as the new front. Returns `true` if the entry
    /// actually moved; an entry already at the front is a no-op and does not
    /// disturb cursors.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not currently belong to this map.
    pub fn move_to_front(&mut self, node: NodeRef) -> bool {
        let slot = self.require(node);
        if self.head == Some(slot) {
            return false;
        }
        self.unlink(slot);
        let old_head = match self.head {
            Some(h) => h,
            None => unreachable!("list with a non-front node cannot be empty"),
        };
        self.slots[slot].prev = None;
        self.slots[slot].next = Some(old_head);
        self.slots[old_head].prev = Some(slot);
        self.head = Some(slot);
        self.bump();
        true
    }

    /// Relinks the entry as the new back. Returns `true` if the entry
    /// actually moved.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not currently belong to this map.
    pub fn move_to_back(&mut self, node: NodeRef) -> bool {
        let slot = self.require(node);
        if self.tail == Some(slot) {
            return false;
        }
        self.unlink(slot);
        let old_tail = match self.tail {
            Some(t) => t,
            None => unreachable!("list with a non-back node cannot be empty"),
        };
        self.slots[slot].next = None;
        self.slots[slot].prev = Some(old_tail);
        self.slots[old_tail].next = Some(slot);
        self.tail = Some(slot);
        self.bump();
        true
    }

    /// Relinks `moved` to sit immediately before `dest`. `moved == dest` and
    /// already-in-position are no-ops returning `false`.
    ///
    /// # Panics
    ///
    /// Panics if either handle does not currently belong to this map.
    pub fn move_before(&mut self, moved: NodeRef, dest: NodeRef) -> bool {
        let moved_slot = self.require(moved);
        let dest_slot = self.require(dest);
        if moved_slot == dest_slot || self.slots[dest_slot].prev == Some(moved_slot) {
            return false;
        }
        self.unlink(moved_slot);
        let prev = self.slots[dest_slot].prev;
        self.slots[moved_slot].prev = prev;
        self.slots[moved_slot].next = Some(dest_slot);
        self.slots[dest_slot].prev = Some(moved_slot);
        match prev {
            Some(p) => self.slots[p].next = Some(moved_slot),
            None => self.head = Some(moved_slot),
        }
        self.bump();
        true
    }

    /// Relinks `moved` to sit immediately after `dest`. `moved == dest` and
    /// already-in-position are no-ops returning `false`.
    ///
    /// # Panics
    ///
    /// Panics if either handle does not currently belong to this map.
    pub fn move_after(&mut self, moved: NodeRef, dest: NodeRef) -> bool {
        let moved_slot = self.require(moved);
        let dest_slot = self.require(dest);
        if moved_slot == dest_slot || self.slots[dest_slot].next == Some(moved_slot) {
            return false;
        }
        self.unlink(moved_slot);
        let next = self.slots[dest_slot].next;
        self.slots[moved_slot].next = next;
        self.slots[moved_slot].prev = Some(dest_slot);
        self.slots[dest_slot].next = Some(moved_slot);
        match next {
            Some(n) => self.slots[n].prev = Some(moved_slot),
            None => self.tail = Some(moved_slot),
        }
        self.bump();
        true
    }

    /// Iterate front-to-back. Double-ended and exact-size.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            front: self.head,
            back: self.tail,
            remaining: self.slots.len(),
        }
    }

    /// Iterate front-to-back with mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let front = self.head;
        let back = self.tail;
        let remaining = self.slots.len();
        IterMut::new(&mut self.slots, front, back, remaining)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.iter_mut().map(|(_, v)| v)
    }

    /// A detached forward walker. Unlike `iter()`, the cursor does not
    /// borrow the map; instead it revalidates against the map on every
    /// access and reports [`Invalidated`](crate::Invalidated) after any
    /// structural mutation or overwrite.
    pub fn cursor(&self) -> Cursor {
        Cursor::capture(self.era, self.version)
    }

    /// The back-to-front counterpart of [`cursor`](Self::cursor).
    pub fn reverse_cursor(&self) -> ReverseCursor {
        ReverseCursor::capture(self.era, self.version)
    }

    /// Clones the entries in iteration order into the front of `dst`.
    /// Fails before writing anything if `dst` is shorter than `len()`.
    pub fn clone_into_slice(&self, dst: &mut [(K, V)]) -> Result<(), CapacityError>
    where
        K: Clone,
        V: Clone,
    {
        if dst.len() < self.len() {
            return Err(CapacityError {
                needed: self.len(),
                available: dst.len(),
            });
        }
        for (out, (k, v)) in dst.iter_mut().zip(self.iter()) {
            *out = (k.clone(), v.clone());
        }
        Ok(())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn hash_of<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find_slot<Q>(&self, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_of(q);
        self.index
            .find(hash, |&s| {
                self.slots
                    .get(s)
                    .map(|n| n.key.borrow() == q)
                    .unwrap_or(false)
            })
            .copied()
    }

    pub fn find<Q>(&self, q: &Q) -> Option<NodeRef>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find_slot(q)?;
        Some(NodeRef { slot, era: self.era })
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_slot(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find_slot(q)?;
        Some(&self.slots[slot].value)
    }

    /// Value-only access: mutating through the returned borrow moves nothing
    /// and does not disturb cursors.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find_slot(q)?;
        Some(&mut self.slots[slot].value)
    }

    pub fn get_full<Q>(&self, q: &Q) -> Option<(NodeRef, &K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find_slot(q)?;
        let node = &self.slots[slot];
        Some((NodeRef { slot, era: self.era }, &node.key, &node.value))
    }

    /// Inserts a key-value pair.
    ///
    /// An existing key keeps its position and its original key; only the
    /// value is overwritten, and the previous value is returned. A new key
    /// links at the back. Both outcomes invalidate outstanding cursors.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_full(key, value).1
    }

    /// Like [`insert`](Self::insert), but also returns the affected entry's
    /// handle. `Option::is_none` on the returned value doubles as the
    /// newly-added signal.
    pub fn insert_full(&mut self, key: K, value: V) -> (NodeRef, Option<V>) {
        let hash = self.hash_of(&key);
        match self.index.entry(
            hash,
            |&s| self.slots.get(s).map(|n| n.key == key).unwrap_or(false),
            |&s| self.slots.get(s).map(|n| n.hash).unwrap_or(0),
        ) {
            IndexEntry::Occupied(occupied) => {
                let slot = *occupied.get();
                let old = mem::replace(&mut self.slots[slot].value, value);
                self.bump();
                (NodeRef { slot, era: self.era }, Some(old))
            }
            IndexEntry::Vacant(vacant) => {
                let slot = self.slots.insert(Node {
                    key,
                    value,
                    hash,
                    prev: None,
                    next: None,
                });
                let _ = vacant.insert(slot);
                self.link_tail(slot);
                self.bump();
                (NodeRef { slot, era: self.era }, None)
            }
        }
    }

    /// Strict insertion: a duplicate key is rejected with the map unchanged.
    /// The sentinel form is `try_insert(..).ok()`.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<NodeRef, InsertError> {
        let hash = self.hash_of(&key);
        match self.index.entry(
            hash,
            |&s| self.slots.get(s).map(|n| n.key == key).unwrap_or(false),
            |&s| self.slots.get(s).map(|n| n.hash).unwrap_or(0),
        ) {
            IndexEntry::Occupied(_) => Err(InsertError::DuplicateKey),
            IndexEntry::Vacant(vacant) => {
                let slot = self.slots.insert(Node {
                    key,
                    value,
                    hash,
                    prev: None,
                    next: None,
                });
                let _ = vacant.insert(slot);
                self.link_tail(slot);
                self.bump();
                Ok(NodeRef { slot, era: self.era })
            }
        }
    }

    /// Removes a key, returning its value. A missing key is a `None` no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find_slot(q)?;
        let node = self.detach(slot);
        Some((node.key, node.value))
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LinkedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Clone for LinkedHashMap<K, V, S>
where
    K: Clone + Eq + Hash,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Rebuilds the map in iteration order. Handles minted by the original
    /// do not resolve against the clone (the clone has its own era).
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity_and_hasher(self.len(), self.hasher.clone());
        for (k, v) in self.iter() {
            out.insert(k.clone(), v.clone());
        }
        out
    }
}

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        let remaining = self.slots.len();
        IntoIter {
            front: self.head,
            back: self.tail,
            remaining,
            slots: self.slots,
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
