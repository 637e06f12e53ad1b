//! Compile-time protocol constants.
//!
//! Mirrors the `constexpr` knobs at the top of `jsonrpc.c` in the
//! reference implementation this crate is ported from.

/// Starting capacity of a connection's inbound buffer, in bytes.
pub const INITIAL_BUFFER_CAP: usize = 4 * 1024;

/// Maximum size of a single JSON-RPC message (one line, excluding the
/// newline), in bytes.
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Maximum size of the inbound buffer, including any not-yet-terminated
/// partial line, in bytes.
pub const MAX_BUFFER_BYTES: usize = 2 * 1024 * 1024;

/// Capacity of the per-connection scoped arena.
pub const ARENA_BYTES: usize = MAX_MESSAGE_BYTES * 2;

/// JSON-RPC 2.0 reserved error codes (spec.md §4.5, §6).
pub const ERR_PARSE: i32 = -32_700;
pub const ERR_INVALID_REQUEST: i32 = -32_600;
pub const ERR_METHOD_NOT_FOUND: i32 = -32_601;
pub const ERR_INVALID_PARAMS: i32 = -32_602;
pub const ERR_INTERNAL: i32 = -32_603;
