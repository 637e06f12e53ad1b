//! JSON-RPC 2.0 envelope validation and dispatch (spec.md §4.5).
//!
//! Ported from `jsonrpc_process_value` / `jsonrpc_process_object` in
//! `original_source/src/jsonrpc.c`.

use serde_json::Value;

use crate::callbacks::{Handlers, RequestOutcome};
use crate::config::{ERR_INVALID_PARAMS, ERR_INVALID_REQUEST, ERR_METHOD_NOT_FOUND};
use crate::handle::ConnHandle;
use crate::response::build_error;
use crate::response::build_result;

fn id_is_valid(id: &Value) -> bool {
    matches!(id, Value::String(_) | Value::Number(_) | Value::Null)
}

fn params_is_valid(params: &Value) -> bool {
    matches!(params, Value::Array(_) | Value::Object(_))
}

/// Validate and dispatch a single JSON-RPC envelope (never a batch
/// array). Returns the response to send, if any.
pub fn process_object<Ctx, H: Handlers<Ctx>>(
    conn: &mut ConnHandle<'_>,
    handlers: &mut H,
    ctx: &mut Ctx,
    value: &Value,
) -> Option<Value> {
    let Some(obj) = value.as_object() else {
        return Some(build_error(None, ERR_INVALID_REQUEST, None));
    };

    match obj.get("jsonrpc").and_then(Value::as_str) {
        Some("2.0") => {}
        _ => return Some(build_error(None, ERR_INVALID_REQUEST, None)),
    }

    let Some(method) = obj.get("method").and_then(Value::as_str) else {
        return Some(build_error(None, ERR_INVALID_REQUEST, None));
    };

    let has_id = obj.contains_key("id");
    let id = obj.get("id");
    if has_id {
        // `contains_key` guarantees `get` returns `Some`.
        if !id_is_valid(id.expect("id key is present")) {
            return Some(build_error(None, ERR_INVALID_REQUEST, None));
        }
    }

    let params = obj.get("params");
    if let Some(p) = params {
        if !params_is_valid(p) {
            return if has_id {
                Some(build_error(id, ERR_INVALID_PARAMS, None))
            } else {
                // Notification with malformed params is silently dropped
                // (spec.md §4.5 step 3, §9 Open Question).
                None
            };
        }
    }

    if !has_id {
        handlers.on_notification(conn, ctx, method, params);
        return None;
    }

    match handlers.on_request(conn, ctx, method, params) {
        RequestOutcome::NotHandled => Some(build_error(id, ERR_METHOD_NOT_FOUND, None)),
        RequestOutcome::Error { code, message } => {
            Some(build_error(id, code, message.as_deref()))
        }
        RequestOutcome::Result(result) => Some(build_result(id, result)),
    }
}

/// Validate and dispatch a parsed JSON value, which may be a single
/// envelope or a batch array (spec.md §4.5 step 2).
pub fn process_value<Ctx, H: Handlers<Ctx>>(
    conn: &mut ConnHandle<'_>,
    handlers: &mut H,
    ctx: &mut Ctx,
    value: &Value,
) -> Option<Value> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Some(build_error(None, ERR_INVALID_REQUEST, None));
            }

            let mut responses = Vec::new();
            for item in items {
                if let Some(response) = process_object(conn, handlers, ctx, item) {
                    responses.push(response);
                }
            }

            if responses.is_empty() {
                None
            } else {
                Some(Value::Array(responses))
            }
        }
        Value::Object(_) => process_object(conn, handlers, ctx, value),
        _ => Some(build_error(None, ERR_INVALID_REQUEST, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::config::ARENA_BYTES;
    use crate::transport::Transport;
    use serde_json::json;

    #[derive(Default)]
    struct NullTransport;

    impl Transport for NullTransport {
        fn send_raw(&mut self, _bytes: &[u8]) -> bool {
            true
        }

        fn close(&mut self) {}
    }

    /// Build a scratch [`ConnHandle`] for tests that call `process_value`/
    /// `process_object` directly (outside a real `Connection::feed`).
    macro_rules! with_conn_handle {
        ($conn:ident, $body:block) => {{
            let arena = Arena::create(ARENA_BYTES).expect("nonzero capacity");
            let mut transport = NullTransport;
            let mut $conn = ConnHandle::new(&mut transport, &arena);
            $body
        }};
    }

    struct RecordingHandlers {
        requests: Vec<(String, Option<Value>)>,
        notifications: Vec<(String, Option<Value>)>,
        next_outcome: RequestOutcome,
    }

    impl RecordingHandlers {
        fn new(next_outcome: RequestOutcome) -> Self {
            Self {
                requests: Vec::new(),
                notifications: Vec::new(),
                next_outcome,
            }
        }
    }

    impl Handlers<()> for RecordingHandlers {
        fn on_request(
            &mut self,
            _conn: &mut ConnHandle<'_>,
            _ctx: &mut (),
            method: &str,
            params: Option<&Value>,
        ) -> RequestOutcome {
            self.requests.push((method.to_owned(), params.cloned()));
            self.next_outcome.clone()
        }

        fn on_notification(
            &mut self,
            _conn: &mut ConnHandle<'_>,
            _ctx: &mut (),
            method: &str,
            params: Option<&Value>,
        ) {
            self.notifications.push((method.to_owned(), params.cloned()));
        }
    }

    #[test]
    fn non_object_non_array_is_invalid_request() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let resp = process_value(&mut conn, &mut h, &mut (), &json!("not an envelope")).unwrap();
            assert_eq!(resp["error"]["code"], ERR_INVALID_REQUEST);
            assert_eq!(resp["id"], Value::Null);
        });
    }

    #[test]
    fn empty_batch_is_invalid_request() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let resp = process_value(&mut conn, &mut h, &mut (), &json!([])).unwrap();
            assert_eq!(resp["error"]["code"], ERR_INVALID_REQUEST);
        });
    }

    #[test]
    fn notification_produces_no_response() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let req = json!({"jsonrpc": "2.0", "method": "notify", "params": ["hello"]});
            assert!(process_value(&mut conn, &mut h, &mut (), &req).is_none());
            assert_eq!(h.notifications.len(), 1);
            assert_eq!(h.notifications[0].0, "notify");
        });
    }

    #[test]
    fn request_with_result_builds_result_envelope() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::Result(json!("pong")));
            let req = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});
            let resp = process_value(&mut conn, &mut h, &mut (), &req).unwrap();
            assert_eq!(resp["result"], json!("pong"));
            assert_eq!(resp["id"], json!(1));
        });
    }

    #[test]
    fn unhandled_request_is_method_not_found() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let req = json!({"jsonrpc": "2.0", "id": 2, "method": "nosuch"});
            let resp = process_value(&mut conn, &mut h, &mut (), &req).unwrap();
            assert_eq!(resp["error"]["code"], ERR_METHOD_NOT_FOUND);
            assert_eq!(resp["id"], json!(2));
        });
    }

    #[test]
    fn missing_jsonrpc_version_is_invalid_request() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let req = json!({"id": 1, "method": "ping"});
            let resp = process_value(&mut conn, &mut h, &mut (), &req).unwrap();
            assert_eq!(resp["error"]["code"], ERR_INVALID_REQUEST);
        });
    }

    #[test]
    fn non_scalar_id_is_invalid_request() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let req = json!({"jsonrpc": "2.0", "id": [1], "method": "ping"});
            let resp = process_value(&mut conn, &mut h, &mut (), &req).unwrap();
            assert_eq!(resp["error"]["code"], ERR_INVALID_REQUEST);
        });
    }

    #[test]
    fn bad_params_on_request_is_invalid_params() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let req = json!({"jsonrpc": "2.0", "id": 1, "method": "ping", "params": "nope"});
            let resp = process_value(&mut conn, &mut h, &mut (), &req).unwrap();
            assert_eq!(resp["error"]["code"], ERR_INVALID_PARAMS);
            assert_eq!(resp["id"], json!(1));
        });
    }

    #[test]
    fn bad_params_on_notification_is_silently_dropped() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let req = json!({"jsonrpc": "2.0", "method": "notify", "params": "nope"});
            assert!(process_value(&mut conn, &mut h, &mut (), &req).is_none());
            assert!(h.notifications.is_empty());
        });
    }

    #[test]
    fn batch_mixes_requests_and_notifications() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::Result(json!("pong")));
            let batch = json!([
                {"jsonrpc": "2.0", "id": 1, "method": "ping"},
                {"jsonrpc": "2.0", "method": "notify"},
            ]);
            let resp = process_value(&mut conn, &mut h, &mut (), &batch).unwrap();
            let arr = resp.as_array().expect("array response");
            assert_eq!(arr.len(), 1);
            assert_eq!(arr[0]["id"], json!(1));
        });
    }

    #[test]
    fn all_notification_batch_produces_no_response() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let batch = json!([
                {"jsonrpc": "2.0", "method": "a"},
                {"jsonrpc": "2.0", "method": "b"},
            ]);
            assert!(process_value(&mut conn, &mut h, &mut (), &batch).is_none());
            assert_eq!(h.notifications.len(), 2);
        });
    }

    #[test]
    fn batch_element_that_is_itself_an_array_is_invalid_request() {
        with_conn_handle!(conn, {
            let mut h = RecordingHandlers::new(RequestOutcome::NotHandled);
            let batch = json!([[1, 2, 3]]);
            let resp = process_value(&mut conn, &mut h, &mut (), &batch).unwrap();
            let arr = resp.as_array().expect("array response");
            assert_eq!(arr.len(), 1);
            assert_eq!(arr[0]["error"]["code"], ERR_INVALID_REQUEST);
        });
    }
}
