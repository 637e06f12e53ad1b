//! The per-connection engine (spec.md §3, §4.4, §4.7).
//!
//! Ported from `jsonrpc_conn_s` / `jsonrpc_conn_new` / `jsonrpc_conn_feed`
//! / `jsonrpc_conn_free` / `jsonrpc_conn_send_result` /
//! `jsonrpc_conn_send_error` in `original_source/src/jsonrpc.c`.

use serde_json::Value;
use tracing::{debug, warn};

use crate::arena::Arena;
use crate::buffer::InboundBuffer;
use crate::callbacks::Handlers;
use crate::config::{ARENA_BYTES, ERR_INVALID_REQUEST, ERR_PARSE, MAX_MESSAGE_BYTES};
use crate::dispatch::process_value;
use crate::handle::ConnHandle;
use crate::response::{build_error, build_result};
use crate::scratch::ScratchBuf;
use crate::transport::Transport;

/// A single protocol connection: transport, handlers, user context,
/// inbound buffer and scoped arena (spec.md §3 "Connection").
pub struct Connection<T: Transport, H: Handlers<Ctx>, Ctx> {
    transport: T,
    handlers: H,
    context: Ctx,
    inbound: InboundBuffer,
    arena: Arena,
    /// Set by an internal fatal error (oversize message/buffer, a send
    /// failure mid-`feed`). Once set, `feed` is a no-op. See
    /// SPEC_FULL.md Open Question 3 for why this is distinct from
    /// `closed` below.
    transport_closed: bool,
    /// Set by `Drop`/`close`; gates the one-time `on_close` emission.
    closed: bool,
}

impl<T: Transport, H: Handlers<Ctx>, Ctx> Connection<T, H, Ctx> {
    /// Create a connection over `transport`, driven by `handlers`, with
    /// the given opaque `context`. Emits `on_open` before returning.
    pub fn new(mut transport: T, mut handlers: H, mut context: Ctx) -> Self {
        let arena = Arena::create(ARENA_BYTES).expect("ARENA_BYTES is nonzero");
        {
            let mut conn = ConnHandle::new(&mut transport, &arena);
            handlers.on_open(&mut conn, &mut context);
        }
        Self {
            transport,
            handlers,
            context,
            inbound: InboundBuffer::new(),
            arena,
            transport_closed: false,
            closed: false,
        }
    }

    /// The connection's user context.
    pub fn context(&self) -> &Ctx {
        &self.context
    }

    /// Mutable access to the connection's user context.
    pub fn context_mut(&mut self) -> &mut Ctx {
        &mut self.context
    }

    /// Whether the transport has been closed, internally or explicitly.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.transport_closed || self.closed
    }

    /// Feed newly-received bytes into the connection. Splits on `\n`,
    /// validates and dispatches every complete line, and writes back at
    /// most one response per line (or one batch response array). A
    /// no-op once the connection is closed.
    pub fn feed(&mut self, bytes: &[u8]) {
        if self.is_closed() || bytes.is_empty() {
            return;
        }

        if self.inbound.append(bytes).is_err() {
            warn!("inbound buffer exceeded cap, closing connection");
            self.send_error(None, ERR_INVALID_REQUEST, Some("Request too large"));
            self.fail_closed();
            return;
        }

        loop {
            if self.is_closed() {
                return;
            }

            let Some(newline_idx) = self.inbound.find_newline() else {
                return;
            };

            let mut line_len = newline_idx;
            let consume_len = newline_idx + 1;
            if line_len > 0 && self.inbound.as_slice()[line_len - 1] == b'\r' {
                line_len -= 1;
            }

            if line_len == 0 {
                self.inbound.consume(consume_len);
                continue;
            }

            if line_len > MAX_MESSAGE_BYTES {
                warn!(line_len, "message exceeded MAX_MESSAGE_BYTES, closing connection");
                self.send_error(None, ERR_INVALID_REQUEST, Some("Request too large"));
                self.fail_closed();
                return;
            }

            let Connection {
                transport,
                handlers,
                context,
                inbound,
                arena,
                ..
            } = self;

            let close_connection = {
                let scope = ArenaScope::begin(arena);
                let scratch =
                    ScratchBuf::copy_from(scope.arena(), &inbound.as_slice()[..line_len]);
                inbound.consume(consume_len);

                match serde_json::from_slice::<Value>(scratch.as_slice()) {
                    Ok(value) => {
                        let mut conn = ConnHandle::new(&mut *transport, scope.arena());
                        let response = process_value(&mut conn, handlers, context, &value);
                        match response {
                            Some(resp) => !send_value(&mut *transport, scope.arena(), &resp),
                            None => false,
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "failed to parse JSON-RPC line");
                        let err = build_error(None, ERR_PARSE, None);
                        !send_value(&mut *transport, scope.arena(), &err)
                    }
                }
                // `scope` drops here, clearing the arena for the next line.
            };

            if close_connection {
                warn!("send failed mid-feed, closing connection");
                self.fail_closed();
                return;
            }
        }
    }

    /// Send an out-of-band result (spec.md `conn_send_result`). Takes
    /// ownership of `result`. Matches `jsonrpc_conn_send_result`: the
    /// send is always attempted, even after the connection has closed —
    /// the transport itself decides success or failure (see the test
    /// `send_after_close_still_attempts_the_send`).
    pub fn send_result(&mut self, id: Option<&Value>, result: Value) -> bool {
        let Connection { transport, arena, .. } = self;
        let scope = ArenaScope::begin(arena);
        let response = build_result(id, result);
        send_value(transport, scope.arena(), &response)
    }

    /// Send an out-of-band error (spec.md `conn_send_error`). Same
    /// unconditional-attempt contract as `send_result` above.
    pub fn send_error(&mut self, id: Option<&Value>, code: i32, message: Option<&str>) -> bool {
        let Connection { transport, arena, .. } = self;
        let scope = ArenaScope::begin(arena);
        let response = build_error(id, code, message);
        send_value(transport, scope.arena(), &response)
    }

    /// Internal fatal-error path: close the transport and disable
    /// further `feed` calls, without emitting `on_close` (which stays
    /// reserved for teardown — see SPEC_FULL.md Open Question 3).
    fn fail_closed(&mut self) {
        self.transport.close();
        self.transport_closed = true;
    }

    /// Explicit teardown, mirroring `jsonrpc_conn_free`. Emits
    /// `on_close` if it has not already fired. Equivalent to dropping
    /// the connection; provided for callers who want teardown to read
    /// as an explicit statement.
    pub fn close(mut self) {
        self.close_mut();
    }

    fn close_mut(&mut self) {
        if !self.closed {
            let mut conn = ConnHandle::new(&mut self.transport, &self.arena);
            self.handlers.on_close(&mut conn, &mut self.context);
            self.closed = true;
        }
    }
}

impl<T: Transport, H: Handlers<Ctx>, Ctx> Drop for Connection<T, H, Ctx> {
    fn drop(&mut self) {
        self.close_mut();
    }
}

/// RAII pairing of "bind before, reset after" for the per-message arena
/// scope (spec.md §4.2 `scope_begin`/`scope_end`). Unlike the C
/// reference there is no global/thread-local binding to save and
/// restore: the scope simply borrows the connection's own arena for its
/// lifetime, which the borrow checker already prevents anyone else from
/// touching concurrently.
struct ArenaScope<'a> {
    arena: &'a mut Arena,
}

impl<'a> ArenaScope<'a> {
    fn begin(arena: &'a mut Arena) -> Self {
        Self { arena }
    }

    fn arena(&self) -> &Arena {
        self.arena
    }
}

impl Drop for ArenaScope<'_> {
    fn drop(&mut self) {
        self.arena.clear();
    }
}

/// Serialize `value`, append a trailing `\n`, and hand the bytes to the
/// transport (spec.md §4.6 `send`). The outbound payload is routed
/// through the same arena-or-heap scratch buffer as the inbound line
/// copy, mirroring the two `jsonrpc_arena_malloc` call sites in the
/// reference. `pub(crate)` so [`crate::handle::ConnHandle`] can reuse it
/// for out-of-band sends issued from inside a callback.
pub(crate) fn send_value(transport: &mut dyn Transport, arena: &Arena, value: &Value) -> bool {
    let Ok(serialized) = serde_json::to_string(value) else {
        return false;
    };
    let mut payload = serialized.into_bytes();
    payload.push(b'\n');
    let scratch = ScratchBuf::copy_from(arena, &payload);
    transport.send_raw(scratch.as_slice())
}
