//! Handshake validation and the remote method table.
//!
//! The first line from the remote must advertise its methods. Rules are
//! checked in this order, stopping at the first failure:
//!
//! 1. line is valid JSON
//! 2. `method` field present
//! 3. `method` is `"methods"`
//! 4. `arguments` field present
//! 5. `arguments` is a list
//! 6. `arguments` has exactly one element
//! 7. that element is an object
//! 8. the object has at least one key

use serde_json::{Map, Value};

use super::message::{strip_terminator, InboundMessage, METHODS};
use crate::error::ProtocolError;

/// Methods advertised by the remote, in declaration order.
///
/// Only the names matter; the values the remote attached to them are kept
/// but never interpreted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodTable {
    methods: Map<String, Value>,
}

impl MethodTable {
    /// Check whether the remote advertised `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names in the order the remote declared them.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Number of advertised methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True if no methods are advertised.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl From<Map<String, Value>> for MethodTable {
    fn from(methods: Map<String, Value>) -> Self {
        Self { methods }
    }
}

/// Validate a handshake line and extract the method table.
///
/// `raw` may carry its line terminator; diagnostics embed the line without it.
pub fn parse_handshake(raw: &str) -> Result<MethodTable, ProtocolError> {
    let line = strip_terminator(raw);
    let msg = InboundMessage::parse(line).map_err(|_| ProtocolError::HandshakeNotJson {
        line: line.to_owned(),
    })?;

    let method = msg.method.ok_or_else(|| ProtocolError::HandshakeMissingMethod {
        line: line.to_owned(),
    })?;
    if method.as_str() != Some(METHODS) {
        return Err(ProtocolError::HandshakeWrongMethod {
            line: line.to_owned(),
        });
    }

    let arguments = msg
        .arguments
        .ok_or_else(|| ProtocolError::HandshakeMissingArguments {
            line: line.to_owned(),
        })?;
    let Value::Array(mut arguments) = arguments else {
        return Err(ProtocolError::HandshakeArgumentsNotArray {
            line: line.to_owned(),
        });
    };
    if arguments.len() != 1 {
        return Err(ProtocolError::HandshakeArgumentCount {
            line: line.to_owned(),
        });
    }

    let Value::Object(methods) = arguments.remove(0) else {
        return Err(ProtocolError::HandshakeMethodsNotObject {
            line: line.to_owned(),
        });
    };
    if methods.is_empty() {
        return Err(ProtocolError::NoRemoteMethods {
            line: line.to_owned(),
        });
    }

    Ok(MethodTable::from(methods))
}
