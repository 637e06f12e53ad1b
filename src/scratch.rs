//! Tagged scratch buffers — the Rust-native replacement for the
//! process-wide tagged allocator shim (spec.md §4.2).
//!
//! The reference installs one pair of `(malloc, free)` functions into a
//! C JSON library, tagging every block with its origin (arena vs.
//! system heap) in a header byte so `free` can route correctly. There
//! is no equivalent hook point for `serde_json`, and there doesn't need
//! to be one: the only allocations this crate explicitly routes through
//! the arena are its own scratch copies (the inbound line before
//! parsing, the serialized line before sending — the same two call
//! sites `jsonrpc_arena_malloc` is used for in `jsonrpc.c`). [`ScratchBuf`]
//! carries the origin tag as an enum discriminant instead of an in-band
//! magic number, and Rust's ownership rules make the "never pass an
//! arena pointer to the system allocator's free" invariant (spec.md §8)
//! true by construction — there is no `free` call for the `Arena`
//! variant at all.

use crate::arena::Arena;

/// Which allocator backed a [`ScratchBuf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Arena,
    Heap,
}

/// A byte buffer that was either bump-allocated from an [`Arena`] or,
/// on arena exhaustion, allocated on the system heap.
pub enum ScratchBuf<'a> {
    Arena(&'a [u8]),
    Heap(Vec<u8>),
}

impl<'a> ScratchBuf<'a> {
    /// Copy `bytes` into the arena, falling back to a heap-owned `Vec`
    /// if the arena is exhausted (or absent).
    #[must_use]
    pub fn copy_from(arena: &'a Arena, bytes: &[u8]) -> Self {
        match arena.alloc_bytes(bytes) {
            Some(slice) => ScratchBuf::Arena(slice),
            None => ScratchBuf::Heap(bytes.to_vec()),
        }
    }

    /// Which allocator actually backed this buffer.
    #[must_use]
    pub fn origin(&self) -> Origin {
        match self {
            ScratchBuf::Arena(_) => Origin::Arena,
            ScratchBuf::Heap(_) => Origin::Heap,
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            ScratchBuf::Arena(slice) => slice,
            ScratchBuf::Heap(vec) => vec.as_slice(),
        }
    }
}
