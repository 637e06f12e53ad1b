//! The transport capability the core consumes (spec.md §6).
//!
//! Replaces the C `jsonrpc_transport_t` function-pointer record. Per
//! spec.md §9's own design note ("model [capability records] as
//! interfaces or vtables, not class hierarchies"), a plain trait is the
//! idiomatic Rust vtable — no `Box<dyn Any>` user-data pointer is
//! needed because the implementor simply holds its own state as fields.

/// A byte-in/byte-out transport a [`crate::Connection`] is driven over.
///
/// Implementations are expected to be synchronous from the core's point
/// of view: `send_raw` either queues/transmits the bytes and returns
/// `true`, or fails and returns `false`. Partial transmission is not a
/// valid outcome at this layer — an implementation that can only write
/// part of a buffer must treat that as failure.
pub trait Transport {
    /// Send `bytes` verbatim. Returns `true` on success.
    fn send_raw(&mut self, bytes: &[u8]) -> bool;

    /// Close the transport. Must be idempotent — called at most once
    /// per fatal condition, but an implementation may be asked to close
    /// a transport that is already closing.
    fn close(&mut self);
}
