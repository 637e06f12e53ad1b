//! Growable inbound byte buffer with a hard cap.
//!
//! Ported from `rpc_buffer_t` / `rpc_buffer_append` / `rpc_buffer_consume`
//! in `original_source/src/jsonrpc.c`. The growth policy (start at
//! [`INITIAL_BUFFER_CAP`], double until `>= desired`) is implemented
//! explicitly rather than leaning on `Vec`'s own (unspecified) growth
//! factor, so the policy itself stays a testable property instead of an
//! implementation detail of the standard library.

use crate::config::{INITIAL_BUFFER_CAP, MAX_BUFFER_BYTES};
use crate::error::{LineRpcError, LineRpcResult};

/// A byte sequence with `len <= cap <= MAX_BUFFER_BYTES`.
#[derive(Debug, Default)]
pub struct InboundBuffer {
    data: Vec<u8>,
}

impl InboundBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Find the offset of the first `\n` in the buffer, if any.
    #[must_use]
    pub fn find_newline(&self) -> Option<usize> {
        self.data.iter().position(|&b| b == b'\n')
    }

    /// Append `bytes`, growing the backing storage first if needed.
    ///
    /// Fails iff `len + bytes.len() > MAX_BUFFER_BYTES`; no partial
    /// appends occur on failure.
    pub fn append(&mut self, bytes: &[u8]) -> LineRpcResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let required = self.data.len() + bytes.len();
        if required > MAX_BUFFER_BYTES {
            return Err(LineRpcError::BufferOverflow {
                max: MAX_BUFFER_BYTES,
            });
        }

        let current_cap = self.data.capacity();
        if required > current_cap {
            let mut new_cap = if current_cap == 0 {
                INITIAL_BUFFER_CAP
            } else {
                current_cap
            };
            while new_cap < required {
                new_cap *= 2;
            }
            self.data.reserve_exact(new_cap - self.data.len());
        }

        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Drop the first `count` bytes, shifting the remainder down.
    /// No-op if `count == 0` or `count > len`.
    pub fn consume(&mut self, count: usize) {
        if count == 0 || count > self.data.len() {
            return;
        }
        self.data.drain(0..count);
    }
}
