//! `linerpc` — a transport-agnostic, newline-delimited JSON-RPC 2.0
//! connection engine.
//!
//! This crate is the *core* of a JSON-RPC 2.0 server: the part that
//! frames a byte stream into lines, validates each line against the
//! JSON-RPC 2.0 envelope shape, dispatches requests and notifications to
//! caller-supplied handlers, and writes back correctly-framed
//! responses. It deliberately knows nothing about sockets, event loops,
//! signal handling or command-line parsing — see [`Transport`] and
//! [`Handlers`] for the two traits an embedder implements to plug the
//! engine into whatever I/O model it already has.
//!
//! # Architecture
//!
//! ```text
//! bytes in --> InboundBuffer --> Framer (Connection::feed) --> dispatch::process_value
//!                                        |                            |
//!                                        v                            v
//!                                     Arena/ScratchBuf            Handlers<Ctx>
//!                                        |                            |
//!                                        v                            v
//!                                  response::build_*  <----------  RequestOutcome
//!                                        |
//!                                        v
//!                                  Transport::send_raw
//! ```
//!
//! Ported from a C reference implementation (`arena.c` / `jsonrpc.c` /
//! `jsonrpc.h`); see `DESIGN.md` for the module-by-module grounding.
//!
//! # Example
//!
//! ```
//! use linerpc::{Connection, ConnHandle, Handlers, RequestOutcome, Transport};
//! use serde_json::{json, Value};
//!
//! struct VecTransport(Vec<u8>);
//! impl Transport for VecTransport {
//!     fn send_raw(&mut self, bytes: &[u8]) -> bool {
//!         self.0.extend_from_slice(bytes);
//!         true
//!     }
//!     fn close(&mut self) {}
//! }
//!
//! struct EchoHandlers;
//! impl Handlers<()> for EchoHandlers {
//!     fn on_request(
//!         &mut self,
//!         _conn: &mut ConnHandle<'_>,
//!         _ctx: &mut (),
//!         method: &str,
//!         params: Option<&Value>,
//!     ) -> RequestOutcome {
//!         match method {
//!             "echo" => RequestOutcome::Result(params.cloned().unwrap_or(Value::Null)),
//!             _ => RequestOutcome::NotHandled,
//!         }
//!     }
//! }
//!
//! let mut conn = Connection::new(VecTransport(Vec::new()), EchoHandlers, ());
//! conn.feed(br#"{"jsonrpc":"2.0","id":1,"method":"echo","params":"hi"}"#);
//! conn.feed(b"\n");
//! ```

pub mod arena;
pub mod buffer;
pub mod callbacks;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod response;
pub mod scratch;
pub mod transport;

pub use callbacks::{Handlers, RequestOutcome};
pub use config::{ARENA_BYTES, INITIAL_BUFFER_CAP, MAX_BUFFER_BYTES, MAX_MESSAGE_BYTES};
pub use connection::Connection;
pub use error::{LineRpcError, LineRpcResult};
pub use handle::ConnHandle;
pub use transport::Transport;
