//! Response envelope construction (spec.md §4.6).
//!
//! Ported from `jsonrpc_build_result` / `jsonrpc_build_error` /
//! `jsonrpc_copy_id` / `jsonrpc_default_message` in
//! `original_source/src/jsonrpc.c`. `serde_json::Value::clone` performs
//! the "deep copy of the incoming id" the reference gets via
//! `json_value_deep_copy` — ownership and cloning are native here, so
//! there is no separate allocate-then-copy step.
//!
//! The envelope shape itself is a typed, derive-`Serialize` struct (the
//! same `JsonRpcResponse`/`JsonRpcError` pattern the teacher's
//! `src/server.rs` uses) rather than assembled field-by-field with the
//! `json!` macro, so a missing/renamed field is a compile error instead
//! of a silent shape drift.

use serde::Serialize;
use serde_json::Value;

use crate::config::{ERR_INTERNAL, ERR_INVALID_PARAMS, ERR_INVALID_REQUEST, ERR_METHOD_NOT_FOUND, ERR_PARSE};

/// A JSON-RPC 2.0 response envelope: exactly one of `result`/`error` is
/// ever populated (spec.md §8 "every emitted response contains exactly
/// the keys `{jsonrpc, id}` plus exactly one of `{result, error}`").
#[derive(Debug, Serialize)]
struct Envelope {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorObject>,
}

#[derive(Debug, Serialize)]
struct ErrorObject {
    code: i32,
    message: String,
}

/// The default message for a well-known JSON-RPC error code, or
/// `"Server error"` for anything else (spec.md §4.5).
#[must_use]
pub fn default_message(code: i32) -> &'static str {
    match code {
        ERR_PARSE => "Parse error",
        ERR_INVALID_REQUEST => "Invalid Request",
        ERR_METHOD_NOT_FOUND => "Method not found",
        ERR_INVALID_PARAMS => "Invalid params",
        ERR_INTERNAL => "Internal error",
        _ => "Server error",
    }
}

/// Deep-copy `id` for inclusion in a response, or `null` if `id` is
/// absent or not one of `{string, number, null}`.
#[must_use]
pub fn copy_id(id: Option<&Value>) -> Value {
    match id {
        None => Value::Null,
        Some(v @ (Value::String(_) | Value::Number(_) | Value::Null)) => v.clone(),
        Some(_) => Value::Null,
    }
}

/// Build a `{jsonrpc, id, result}` envelope, taking ownership of `result`.
#[must_use]
pub fn build_result(id: Option<&Value>, result: Value) -> Value {
    let envelope = Envelope {
        jsonrpc: "2.0",
        id: copy_id(id),
        result: Some(result),
        error: None,
    };
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}

/// Build a `{jsonrpc, id, error}` envelope. `message` overrides the
/// default message for `code` when present.
#[must_use]
pub fn build_error(id: Option<&Value>, code: i32, message: Option<&str>) -> Value {
    let message = message.unwrap_or_else(|| default_message(code)).to_owned();
    let envelope = Envelope {
        jsonrpc: "2.0",
        id: copy_id(id),
        result: None,
        error: Some(ErrorObject { code, message }),
    };
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}
