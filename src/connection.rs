//! Connection builder and synchronous call loop.
//!
//! A [`Connection`] goes through two states:
//! 1. Handshake (inside construction): read the remote's method list,
//!    validate it, write the acknowledgement
//! 2. Ready: each [`Connection::call`] writes one request line and blocks
//!    until the matching response line arrives
//!
//! A failed handshake yields no connection at all. A failed call leaves
//! the connection in place, but after a protocol or transport error the
//! stream framing can no longer be trusted and the connection should be
//! dropped.
//!
//! # Example
//!
//! ```
//! use dnode_sync_client::transport::MemoryStream;
//! use dnode_sync_client::Connection;
//! use serde_json::json;
//!
//! let remote = MemoryStream::new();
//! remote.add_read("{\"method\":\"methods\",\"arguments\":[{\"echo\":\"\"}]}\n");
//! remote.add_read("{\"method\":0,\"arguments\":[\"hi\"]}\n");
//!
//! let mut conn = Connection::new(remote.clone()).unwrap();
//! assert_eq!(conn.available_methods(), vec!["echo"]);
//!
//! let result = conn.call("echo", vec![json!("hi")]).unwrap();
//! assert_eq!(result, vec![json!("hi")]);
//! ```

use std::net::ToSocketAddrs;

use serde_json::Value;

use crate::error::{DnodeError, Result};
use crate::protocol::{
    encode_line, parse_handshake, parse_response, CallRequest, HandshakeAck, MethodTable,
};
use crate::transport::{ConnectOptions, IoStream, LineStream, TcpLineStream};

/// Default first callback id.
pub const DEFAULT_FIRST_CALLBACK_ID: u64 = 0;

/// Builder for configuring a connection before its handshake.
#[derive(Debug, Clone)]
pub struct ConnectionBuilder {
    first_callback_id: u64,
}

impl ConnectionBuilder {
    /// Create a new connection builder.
    pub fn new() -> Self {
        Self {
            first_callback_id: DEFAULT_FIRST_CALLBACK_ID,
        }
    }

    /// Set the callback id used by the first call.
    ///
    /// Later calls count up from here. Default: 0
    pub fn first_callback_id(mut self, id: u64) -> Self {
        self.first_callback_id = id;
        self
    }

    /// Perform the handshake over `stream` and return a ready connection.
    pub fn handshake<S: LineStream>(self, stream: S) -> Result<Connection<S>> {
        Connection::handshake(stream, self.first_callback_id)
    }

    /// Open a TCP connection to `addr` and perform the handshake.
    pub fn connect<A: ToSocketAddrs>(
        self,
        addr: A,
        options: &ConnectOptions,
    ) -> Result<Connection<TcpLineStream>> {
        let stream = IoStream::connect_tcp(addr, options)?;
        tracing::debug!(peer = ?stream.peer_addr().ok(), "Connected to remote");
        self.handshake(stream)
    }
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A ready connection to a remote that exposes callable methods.
///
/// The connection owns its stream but never closes it; use
/// [`Connection::into_inner`] to take it back. Calls take `&mut self`, so
/// only one call can be in flight; wrap the connection in a `Mutex` to
/// share it between threads.
#[derive(Debug)]
pub struct Connection<S> {
    stream: S,
    /// Populated once by the handshake, never modified afterwards.
    methods: MethodTable,
    /// Id for the next call. Only ever increases.
    next_callback_id: u64,
}

impl Connection<()> {
    /// Create a new connection builder.
    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::new()
    }
}

impl Connection<TcpLineStream> {
    /// Open a TCP connection to `addr` and perform the handshake.
    pub fn connect<A: ToSocketAddrs>(addr: A, options: &ConnectOptions) -> Result<Self> {
        ConnectionBuilder::new().connect(addr, options)
    }
}

impl<S: LineStream> Connection<S> {
    /// Perform the handshake over `stream` with default settings.
    pub fn new(stream: S) -> Result<Self> {
        Self::handshake(stream, DEFAULT_FIRST_CALLBACK_ID)
    }

    fn handshake(mut stream: S, first_callback_id: u64) -> Result<Self> {
        let line = stream.read_line()?.ok_or_else(|| {
            DnodeError::Transport("Can't read method description from remote".into())
        })?;
        tracing::trace!(line = %line.trim_end(), "Received handshake");

        let methods = parse_handshake(&line)?;

        stream.write_all(&encode_line(&HandshakeAck::new())?)?;
        tracing::debug!(methods = methods.len(), "Handshake complete");

        Ok(Self {
            stream,
            methods,
            next_callback_id: first_callback_id,
        })
    }

    /// Call `method` on the remote and return the response arguments.
    ///
    /// Fails with [`DnodeError::MethodNotFound`] before writing anything if
    /// the remote did not advertise `method`, and with
    /// [`DnodeError::CallbackIdsExhausted`] once the counter cannot advance.
    pub fn call(&mut self, method: &str, arguments: Vec<Value>) -> Result<Vec<Value>> {
        if !self.methods.contains(method) {
            return Err(DnodeError::MethodNotFound(method.to_string()));
        }

        let callback_id = self.next_callback_id;
        self.next_callback_id = callback_id
            .checked_add(1)
            .ok_or(DnodeError::CallbackIdsExhausted)?;

        let request = CallRequest::new(method, &arguments, callback_id);
        let line = encode_line(&request)?;
        tracing::trace!(method, callback_id, "Sending call");
        self.stream.write_all(&line)?;

        let response = self
            .stream
            .read_line()?
            .ok_or_else(|| DnodeError::Transport("Can't read response from remote".into()))?;
        tracing::trace!(callback_id, line = %response.trim_end(), "Received response");

        Ok(parse_response(&response, callback_id)?)
    }

    /// Call `method` with no arguments.
    pub fn call_no_args(&mut self, method: &str) -> Result<Vec<Value>> {
        self.call(method, Vec::new())
    }

    /// Method names advertised by the remote, in declaration order.
    pub fn available_methods(&self) -> Vec<&str> {
        self.methods.names().collect()
    }

    /// Check whether the remote advertised `method`.
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    /// The full method table from the handshake.
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Callback id the next call will use.
    pub fn next_callback_id(&self) -> u64 {
        self.next_callback_id
    }

    /// Get a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Get a mutable reference to the underlying stream.
    ///
    /// Reading or writing through it desynchronizes the call sequence.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Give the stream back to the caller.
    pub fn into_inner(self) -> S {
        self.stream
    }
}
