//! Wire message types.
//!
//! Outbound messages are serde structs, so fields serialize in declaration
//! order. Inbound messages are lifted from a parsed JSON value into
//! [`InboundMessage`], which records field presence explicitly.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Method name of the handshake message and its acknowledgement.
pub const METHODS: &str = "methods";

/// Acknowledgement written after a valid handshake: `{"method":"methods"}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HandshakeAck {
    method: &'static str,
}

impl HandshakeAck {
    /// Create the acknowledgement message.
    pub fn new() -> Self {
        Self { method: METHODS }
    }
}

impl Default for HandshakeAck {
    fn default() -> Self {
        Self::new()
    }
}

/// Outbound method call.
///
/// `callbacks` always holds exactly one entry: the callback id mapped to
/// the argument slot a callback would occupy, i.e. the argument count.
/// No callback value is ever transmitted.
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest<'a> {
    pub method: &'a str,
    pub arguments: &'a [Value],
    pub callbacks: BTreeMap<String, [usize; 1]>,
}

impl<'a> CallRequest<'a> {
    /// Build a call of `method` expecting its response on `callback_id`.
    pub fn new(method: &'a str, arguments: &'a [Value], callback_id: u64) -> Self {
        let mut callbacks = BTreeMap::new();
        callbacks.insert(callback_id.to_string(), [arguments.len()]);
        Self {
            method,
            arguments,
            callbacks,
        }
    }
}

/// Serialize a message as compact JSON followed by `\n`.
pub fn encode_line<T: Serialize>(message: &T) -> serde_json::Result<Vec<u8>> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    Ok(line)
}

/// Strip one trailing `\n` or `\r\n` from a raw line.
pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// An inbound message with the fields this client inspects.
///
/// `None` means the key is absent; a key present with `null` is
/// `Some(Value::Null)`. A valid JSON document that is not an object has
/// no fields at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundMessage {
    pub method: Option<Value>,
    pub arguments: Option<Value>,
    pub links: Option<Value>,
    pub callbacks: Option<Value>,
}

impl InboundMessage {
    /// Parse one line of JSON.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        Ok(Self::from_value(value))
    }

    /// Lift a parsed value into its message fields.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                method: fields.remove("method"),
                arguments: fields.remove("arguments"),
                links: fields.remove("links"),
                callbacks: fields.remove("callbacks"),
            },
            _ => Self::default(),
        }
    }
}
