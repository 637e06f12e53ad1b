//! Per-message bump arena.
//!
//! Ported from `arena_create`/`arena_alloc`/`arena_clear`/`arena_destroy`
//! in `original_source/src/arena.c`. The reference is a hand-rolled
//! contiguous-region bump allocator; this version is a thin
//! capacity-bounded wrapper over [`bumpalo::Bump`], which is the
//! ecosystem's bump allocator and already reclaims in O(1) via
//! [`bumpalo::Bump::reset`]. Reset is a call to `clear`, destruction is
//! `Drop` — see SPEC_FULL.md Open Question 2 for why no custom
//! alignment API is exposed.

use bumpalo::Bump;

/// A fixed-capacity scoped bump arena.
///
/// `capacity` bounds total live allocation; once exceeded, [`Arena::alloc_bytes`]
/// returns `None` rather than growing further, matching the reference's
/// "falls back to the system heap" contract (the fallback itself lives
/// in [`crate::scratch::ScratchBuf`], one layer up).
pub struct Arena {
    bump: Bump,
    capacity: usize,
}

impl Arena {
    /// Create an arena with the given byte capacity. `capacity == 0`
    /// yields no arena, matching spec.md §4.1.
    #[must_use]
    pub fn create(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        Some(Self {
            bump: Bump::with_capacity(capacity),
            capacity,
        })
    }

    /// Total capacity this arena was created with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently allocated out of this arena.
    #[must_use]
    pub fn used(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Copy `bytes` into the arena and return a slice backed by it.
    ///
    /// Returns `None` if `bytes` is empty or the allocation would push
    /// total usage past `capacity`.
    #[must_use]
    pub fn alloc_bytes(&self, bytes: &[u8]) -> Option<&[u8]> {
        if bytes.is_empty() {
            return None;
        }
        if self.used().saturating_add(bytes.len()) > self.capacity {
            return None;
        }
        Some(self.bump.alloc_slice_copy(bytes))
    }

    /// Reset the arena's bump index to zero without releasing the
    /// backing region. O(1), matching `arena_clear`.
    pub fn clear(&mut self) {
        self.bump.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_yields_no_arena() {
        assert!(Arena::create(0).is_none());
    }

    #[test]
    fn alloc_copies_bytes_and_tracks_usage() {
        let arena = Arena::create(256).expect("nonzero capacity");
        let slice = arena.alloc_bytes(b"hello").expect("fits in arena");
        assert_eq!(slice, b"hello");
        assert!(arena.used() >= 5);
    }

    #[test]
    fn empty_alloc_yields_nothing() {
        let arena = Arena::create(256).expect("nonzero capacity");
        assert!(arena.alloc_bytes(b"").is_none());
    }

    #[test]
    fn exhaustion_returns_none() {
        let arena = Arena::create(8).expect("nonzero capacity");
        assert!(arena.alloc_bytes(&[0u8; 64]).is_none());
    }

    #[test]
    fn clear_resets_usage() {
        let mut arena = Arena::create(256).expect("nonzero capacity");
        arena.alloc_bytes(b"hello world").expect("fits in arena");
        assert!(arena.used() > 0);
        arena.clear();
        assert_eq!(arena.used(), 0);
    }
}
