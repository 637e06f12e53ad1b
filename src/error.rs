//! Internal error types for the linerpc crate.
//!
//! These are distinct from JSON-RPC protocol errors (§7 of the spec):
//! a protocol error is a successful outcome from the engine's point of
//! view (a well-formed error envelope was sent to the peer). The types
//! here cover the one failure mode the core itself can hit outside the
//! wire protocol — the inbound buffer growing past its hard cap.

/// Errors raised by the core's internal buffer management.
#[derive(Debug, thiserror::Error)]
pub enum LineRpcError {
    /// Appending would grow the inbound buffer past `MAX_BUFFER_BYTES`.
    #[error("inbound buffer would exceed {max} bytes")]
    BufferOverflow { max: usize },
}

/// Convenience result type for internal buffer operations.
pub type LineRpcResult<T> = Result<T, LineRpcError>;
