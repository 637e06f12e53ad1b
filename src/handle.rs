//! A narrow, reentrant capability into the owning connection, handed to
//! every [`crate::Handlers`] callback (spec.md §6: every callback is
//! typed with `conn` as an argument, mirroring
//! `original_source/src/main.c`'s `my_on_request(jsonrpc_conn_t *conn, ...)`).
//!
//! Unlike the C reference, which hands the callback the whole opaque
//! `jsonrpc_conn_t *` (and thus, transitively, every field on it),
//! [`ConnHandle`] exposes only what a callback legitimately needs to
//! reach back into the connection from inside its own invocation: an
//! out-of-band `send_result`/`send_error`. `Ctx` access is threaded to
//! callbacks as its own parameter rather than through this handle (see
//! `SPEC_FULL.md` Open Question 5 for why), so the handle itself only
//! ever needs to borrow the transport and the arena.

use serde_json::Value;

use crate::arena::Arena;
use crate::connection::send_value;
use crate::response::{build_error, build_result};
use crate::transport::Transport;

/// A short-lived reference to a connection's transport and scratch
/// arena, valid only for the duration of a single callback invocation.
pub struct ConnHandle<'a> {
    transport: &'a mut dyn Transport,
    arena: &'a Arena,
}

impl<'a> ConnHandle<'a> {
    pub(crate) fn new(transport: &'a mut dyn Transport, arena: &'a Arena) -> Self {
        Self { transport, arena }
    }

    /// Send an out-of-band result from inside a callback. Takes
    /// ownership of `result`; mirrors [`crate::Connection::send_result`].
    pub fn send_result(&mut self, id: Option<&Value>, result: Value) -> bool {
        let response = build_result(id, result);
        send_value(self.transport, self.arena, &response)
    }

    /// Send an out-of-band error from inside a callback; mirrors
    /// [`crate::Connection::send_error`].
    pub fn send_error(&mut self, id: Option<&Value>, code: i32, message: Option<&str>) -> bool {
        let response = build_error(id, code, message);
        send_value(self.transport, self.arena, &response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ARENA_BYTES;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Vec<Vec<u8>>,
        closed: bool,
    }

    impl Transport for RecordingTransport {
        fn send_raw(&mut self, bytes: &[u8]) -> bool {
            self.sent.push(bytes.to_vec());
            true
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn send_result_reaches_the_underlying_transport() {
        let arena = Arena::create(ARENA_BYTES).expect("nonzero capacity");
        let mut transport = RecordingTransport::default();
        let mut handle = ConnHandle::new(&mut transport, &arena);
        assert!(handle.send_result(Some(&json!(1)), json!("ok")));
        drop(handle);
        assert_eq!(transport.sent.len(), 1);
    }

    #[test]
    fn send_error_reaches_the_underlying_transport() {
        let arena = Arena::create(ARENA_BYTES).expect("nonzero capacity");
        let mut transport = RecordingTransport::default();
        let mut handle = ConnHandle::new(&mut transport, &arena);
        assert!(handle.send_error(None, -1, Some("custom")));
        drop(handle);
        assert_eq!(transport.sent.len(), 1);
    }
}
