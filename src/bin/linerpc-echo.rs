//! `linerpc-echo` — a standalone stdio demo server.
//!
//! Reads newline-delimited JSON-RPC 2.0 requests from stdin and writes
//! responses to stdout, one per line. Implements `ping`, `echo` and
//! `add`, the same three demo methods as `original_source/src/main.c`'s
//! `my_on_request`. A blocking stdin reader is a legitimate "synchronous
//! harness" per spec.md §1 and needs no extra async runtime — the
//! TCP/libuv acceptor in the reference's `server.c` is exactly the kind
//! of transport glue this crate leaves to the embedder.
//!
//! Usage: `linerpc-echo`

use std::io::{Read, Write};

use linerpc::{Connection, ConnHandle, Handlers, RequestOutcome, Transport};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Sends response bytes straight to stdout, one write per response.
struct StdioTransport {
    stdout: std::io::Stdout,
}

impl Transport for StdioTransport {
    fn send_raw(&mut self, bytes: &[u8]) -> bool {
        let mut out = self.stdout.lock();
        out.write_all(bytes).is_ok() && out.flush().is_ok()
    }

    fn close(&mut self) {
        warn!("transport closed by the engine");
    }
}

/// Demo handlers: `ping`, `echo`, `add`, plus notification logging.
struct DemoHandlers;

impl Handlers<()> for DemoHandlers {
    fn on_open(&mut self, _conn: &mut ConnHandle<'_>, (): &mut ()) {
        info!("new JSON-RPC connection opened");
    }

    fn on_close(&mut self, _conn: &mut ConnHandle<'_>, (): &mut ()) {
        info!("JSON-RPC connection closed");
    }

    fn on_request(
        &mut self,
        _conn: &mut ConnHandle<'_>,
        (): &mut (),
        method: &str,
        params: Option<&Value>,
    ) -> RequestOutcome {
        match method {
            "ping" => RequestOutcome::Result(Value::String("pong".to_owned())),
            "echo" => match params {
                Some(p) => RequestOutcome::Result(p.clone()),
                None => RequestOutcome::Error {
                    code: linerpc::config::ERR_INVALID_PARAMS,
                    message: Some("Missing params".to_owned()),
                },
            },
            "add" => handle_add(params),
            _ => RequestOutcome::NotHandled,
        }
    }

    fn on_notification(
        &mut self,
        _conn: &mut ConnHandle<'_>,
        (): &mut (),
        method: &str,
        params: Option<&Value>,
    ) {
        match params.and_then(Value::as_str) {
            Some(text) => info!(method, text, "notification"),
            None => info!(method, "notification"),
        }
    }
}

fn handle_add(params: Option<&Value>) -> RequestOutcome {
    let Some(array) = params.and_then(Value::as_array) else {
        return RequestOutcome::Error {
            code: linerpc::config::ERR_INVALID_PARAMS,
            message: Some("Expected array params".to_owned()),
        };
    };

    let mut sum = 0.0;
    for item in array {
        let Some(n) = item.as_f64() else {
            return RequestOutcome::Error {
                code: linerpc::config::ERR_INVALID_PARAMS,
                message: Some("All params must be numbers".to_owned()),
            };
        };
        sum += n;
    }

    RequestOutcome::Result(serde_json::json!(sum))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("linerpc-echo starting on stdio");

    let transport = StdioTransport {
        stdout: std::io::stdout(),
    };
    let mut conn = Connection::new(transport, DemoHandlers, ());

    let stdin = std::io::stdin();
    let mut reader = std::io::BufReader::new(stdin.lock());
    let mut chunk = [0u8; 4096];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            debug!("stdin closed");
            break;
        }
        conn.feed(&chunk[..n]);
        if conn.is_closed() {
            break;
        }
    }

    conn.close();
    info!("linerpc-echo stopped");
    Ok(())
}
