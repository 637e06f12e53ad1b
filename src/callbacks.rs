//! The handler capability the core invokes (spec.md §6).
//!
//! Replaces the C `jsonrpc_callbacks_t` record. "Any field may be
//! absent" maps onto default (no-op) trait methods rather than `Option`
//! function pointers.

use serde_json::Value;

use crate::handle::ConnHandle;

/// What an `on_request` handler did with a call.
///
/// The sum-type redesign spec.md §9 suggests in place of the C
/// `jsonrpc_response_t` out-param: `NotHandled` triggers "Method not
/// found", `Error` triggers a peer-visible error envelope with the
/// given code (and optional override message), `Result` transfers
/// ownership of the handler's JSON result to the core for envelope
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The method is unknown to this handler; the core replies "Method
    /// not found".
    NotHandled,
    /// The handler failed this call with a JSON-RPC error code.
    /// `message` overrides the default message for `code` when present.
    Error { code: i32, message: Option<String> },
    /// The handler succeeded with this result value.
    Result(Value),
}

/// Application callbacks for a [`crate::Connection`].
///
/// `Ctx` is the connection's user context type — the Rust replacement
/// for the C API's opaque `void *user_context`, threaded through every
/// callback as its own parameter instead of retrieved via
/// `jsonrpc_conn_get_context(conn)`.
///
/// Every callback also receives a [`ConnHandle`], matching spec.md §6's
/// callback signatures (`on_open(conn)`, `on_close(conn)`,
/// `on_request(conn, method, params, &descriptor)`,
/// `on_notification(conn, method, params)`): the handle lets a callback
/// reach back into the owning connection to push an out-of-band
/// `send_result`/`send_error` of its own, the same capability
/// `original_source/src/main.c`'s `my_on_request(jsonrpc_conn_t *conn, ...)`
/// gets from its `conn` argument.
pub trait Handlers<Ctx> {
    /// Invoked once, synchronously, from [`crate::Connection::new`].
    fn on_open(&mut self, _conn: &mut ConnHandle<'_>, _ctx: &mut Ctx) {}

    /// Invoked at most once, at teardown (spec.md §4.7).
    fn on_close(&mut self, _conn: &mut ConnHandle<'_>, _ctx: &mut Ctx) {}

    /// Handle a JSON-RPC request (an envelope with an `id`).
    fn on_request(
        &mut self,
        _conn: &mut ConnHandle<'_>,
        _ctx: &mut Ctx,
        _method: &str,
        _params: Option<&Value>,
    ) -> RequestOutcome {
        RequestOutcome::NotHandled
    }

    /// Handle a JSON-RPC notification (an envelope without an `id`).
    /// No response is ever sent for a notification regardless of what
    /// this returns.
    fn on_notification(
        &mut self,
        _conn: &mut ConnHandle<'_>,
        _ctx: &mut Ctx,
        _method: &str,
        _params: Option<&Value>,
    ) {
    }
}
