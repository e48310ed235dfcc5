//! Detached fail-fast cursors.
//!
//! A cursor does not borrow its map. Instead it captures the map's
//! `(era, version)` pair at creation and revalidates on every access, so the
//! map stays freely usable between steps and any structural mutation (or
//! value overwrite) since capture is reported as [`Invalidated`] instead of
//! producing a torn walk. `reset` re-captures; it never rewinds over a
//! mutation.
//!
//! State machine per access: unstarted (before the first entry), positioned
//! (on a live entry), exhausted (past the last entry).

use core::fmt;

use slotmap::DefaultKey;

use crate::linked_hash_map::{LinkedHashMap, NodeRef};

/// The cursor's captured `(era, version)` no longer matches the map: the map
/// was mutated since capture, or the cursor was created by a different map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidated;

impl fmt::Display for Invalidated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cursor invalidated by container mutation")
    }
}

impl std::error::Error for Invalidated {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Unstarted,
    On(DefaultKey),
    Exhausted,
}

/// Forward walker over a [`LinkedHashMap`], front to back.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    era: u64,
    version: u64,
    pos: Position,
}

impl Cursor {
    pub(crate) fn capture(era: u64, version: u64) -> Self {
        Cursor {
            era,
            version,
            pos: Position::Unstarted,
        }
    }

    fn check<K, V, S>(&self, map: &LinkedHashMap<K, V, S>) -> Result<(), Invalidated> {
        if self.era == map.era && self.version == map.version {
            Ok(())
        } else {
            Err(Invalidated)
        }
    }

    /// Steps to the next entry. `Ok(true)` when positioned on one,
    /// `Ok(false)` once the walk is exhausted (including on an empty map).
    pub fn move_next<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<bool, Invalidated> {
        self.check(map)?;
        let next = match self.pos {
            Position::Unstarted => map.head,
            Position::On(slot) => map.slots[slot].next,
            Position::Exhausted => None,
        };
        Ok(match next {
            Some(slot) => {
                self.pos = Position::On(slot);
                true
            }
            None => {
                self.pos = Position::Exhausted;
                false
            }
        })
    }

    /// The entry the cursor is positioned on, or `None` when unstarted or
    /// exhausted.
    pub fn current<'a, K, V, S>(
        &self,
        map: &'a LinkedHashMap<K, V, S>,
    ) -> Result<Option<(&'a K, &'a V)>, Invalidated> {
        self.check(map)?;
        Ok(match self.pos {
            Position::On(slot) => {
                let node = &map.slots[slot];
                Some((&node.key, &node.value))
            }
            _ => None,
        })
    }

    /// Handle of the current entry, without touching the map.
    pub fn node(&self) -> Option<NodeRef> {
        match self.pos {
            Position::On(slot) => Some(NodeRef {
                slot,
                era: self.era,
            }),
            _ => None,
        }
    }

    /// Re-captures the map's current `(era, version)` and rewinds to the
    /// unstarted state. This is the only way to keep using a cursor after a
    /// mutation.
    pub fn reset<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) {
        *self = Cursor::capture(map.era, map.version);
    }
}

/// Backward walker over a [`LinkedHashMap`], back to front: the exact
/// mirror of [`Cursor`] at every point in time.
#[derive(Debug, Clone, Copy)]
pub struct ReverseCursor {
    era: u64,
    version: u64,
    pos: Position,
}

impl ReverseCursor {
    pub(crate) fn capture(era: u64, version: u64) -> Self {
        ReverseCursor {
            era,
            version,
            pos: Position::Unstarted,
        }
    }

    fn check<K, V, S>(&self, map: &LinkedHashMap<K, V, S>) -> Result<(), Invalidated> {
        if self.era == map.era && self.version == map.version {
            Ok(())
        } else {
            Err(Invalidated)
        }
    }

    /// Steps to the previous entry, starting from the back.
    pub fn move_next<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<bool, Invalidated> {
        self.check(map)?;
        let next = match self.pos {
            Position::Unstarted => map.tail,
            Position::On(slot) => map.slots[slot].prev,
            Position::Exhausted => None,
        };
        Ok(match next {
            Some(slot) => {
                self.pos = Position::On(slot);
                true
            }
            None => {
                self.pos = Position::Exhausted;
                false
            }
        })
    }

    pub fn current<'a, K, V, S>(
        &self,
        map: &'a LinkedHashMap<K, V, S>,
    ) -> Result<Option<(&'a K, &'a V)>, Invalidated> {
        self.check(map)?;
        Ok(match self.pos {
            Position::On(slot) => {
                let node = &map.slots[slot];
                Some((&node.key, &node.value))
            }
            _ => None,
        })
    }

    pub fn node(&self) -> Option<NodeRef> {
        match self.pos {
            Position::On(slot) => Some(NodeRef {
                slot,
                era: self.era,
            }),
            _ => None,
        }
    }

    pub fn reset<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) {
        *self = ReverseCursor::capture(map.era, map.version);
    }
}
