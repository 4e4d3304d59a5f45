//! # dnode-sync-client
//!
//! Synchronous client for the dnode line-delimited JSON RPC protocol.
//!
//! This crate calls methods exposed by a remote dnode peer over any
//! bidirectional byte stream, blocking on each round trip instead of
//! running an event loop.
//!
//! ## Protocol
//!
//! - **Handshake**: the remote sends its method names, the client acknowledges
//! - **Calls**: one request line out, one response line back, correlated by
//!   an integer callback id
//!
//! Object references ("links") and callbacks sent by the remote are not
//! supported and are rejected as protocol errors.
//!
//! ## Example
//!
//! ```no_run
//! use dnode_sync_client::transport::ConnectOptions;
//! use dnode_sync_client::Connection;
//! use serde_json::json;
//!
//! fn main() -> dnode_sync_client::Result<()> {
//!     let mut conn = Connection::connect("127.0.0.1:5004", &ConnectOptions::default())?;
//!
//!     println!("remote methods: {:?}", conn.available_methods());
//!     let result = conn.call("add", vec![json!(1), json!(2)])?;
//!     println!("result: {:?}", result);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod protocol;
pub mod transport;

mod connection;

pub use connection::{Connection, ConnectionBuilder, DEFAULT_FIRST_CALLBACK_ID};
pub use error::{DnodeError, ProtocolError, Result};
