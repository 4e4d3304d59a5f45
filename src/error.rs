//! Error types for dnode-sync-client.

use thiserror::Error;

/// Main error type for all connection operations.
#[derive(Debug, Error)]
pub enum DnodeError {
    /// I/O error from the underlying stream (read, write or connect).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was exhausted where a line was required.
    #[error("{0}")]
    Transport(String),

    /// The remote sent a message that does not match the protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The caller asked for a method the remote never advertised.
    #[error("Method {0} does not exists on remote.")]
    MethodNotFound(String),

    /// The callback counter reached its maximum; no further call can be
    /// correlated on this connection.
    #[error("Callback ids exhausted")]
    CallbackIdsExhausted,

    /// JSON serialization error for an outbound message.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DnodeError {
    /// True for wire anomalies (malformed or unexpected messages).
    pub fn is_protocol(&self) -> bool {
        matches!(self, DnodeError::Protocol(_))
    }

    /// True when the stream ended or failed underneath the connection.
    pub fn is_transport(&self) -> bool {
        matches!(self, DnodeError::Transport(_) | DnodeError::Io(_))
    }

    /// True when a call named a method the remote does not expose.
    pub fn is_method_not_found(&self) -> bool {
        matches!(self, DnodeError::MethodNotFound(_))
    }

    /// Whether the connection can still be used after this error.
    ///
    /// Only [`DnodeError::MethodNotFound`] qualifies: it is raised before
    /// anything is written, so the stream framing is untouched. After any
    /// other error the connection should be discarded.
    pub fn is_recoverable(&self) -> bool {
        self.is_method_not_found()
    }
}

/// A protocol violation, carrying the raw line that caused it.
///
/// The line is stored without its trailing line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("First line is not valid json: {line}")]
    HandshakeNotJson { line: String },

    #[error("First line does not have method field: {line}")]
    HandshakeMissingMethod { line: String },

    #[error("First line method must be \"methods\": {line}")]
    HandshakeWrongMethod { line: String },

    #[error("Methods arguments missing: {line}")]
    HandshakeMissingArguments { line: String },

    /// `arguments` is present but not a list.
    #[error("Methods arguments must be array: {line}")]
    HandshakeArgumentsNotArray { line: String },

    #[error("Methods must have single argument: {line}")]
    HandshakeArgumentCount { line: String },

    /// The single handshake argument is not a name → marker object.
    #[error("Methods argument must be object: {line}")]
    HandshakeMethodsNotObject { line: String },

    #[error("Remote is expected to have some methods: {line}")]
    NoRemoteMethods { line: String },

    #[error("Response is not valid json: {line}")]
    ResponseNotJson { line: String },

    #[error("Response does not have method field: {line}")]
    ResponseMissingMethod { line: String },

    #[error("Response does not call expected callback, expected {expected}, got {line}")]
    UnexpectedCallback { expected: u64, line: String },

    #[error("Response contains links, we do not support that: {line}")]
    ResponseHasLinks { line: String },

    #[error("Response contains callbacks, we do not support that: {line}")]
    ResponseHasCallbacks { line: String },

    #[error("Response arguments must be array: {line}")]
    ResponseArgumentsNotArray { line: String },
}

impl ProtocolError {
    /// The raw line that triggered the violation.
    pub fn line(&self) -> &str {
        match self {
            ProtocolError::HandshakeNotJson { line }
            | ProtocolError::HandshakeMissingMethod { line }
            | ProtocolError::HandshakeWrongMethod { line }
            | ProtocolError::HandshakeMissingArguments { line }
            | ProtocolError::HandshakeArgumentsNotArray { line }
            | ProtocolError::HandshakeArgumentCount { line }
            | ProtocolError::HandshakeMethodsNotObject { line }
            | ProtocolError::NoRemoteMethods { line }
            | ProtocolError::ResponseNotJson { line }
            | ProtocolError::ResponseMissingMethod { line }
            | ProtocolError::UnexpectedCallback { line, .. }
            | ProtocolError::ResponseHasLinks { line }
            | ProtocolError::ResponseHasCallbacks { line }
            | ProtocolError::ResponseArgumentsNotArray { line } => line,
        }
    }
}

/// Result type alias using DnodeError.
pub type Result<T> = std::result::Result<T, DnodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_found_message() {
        let err = DnodeError::MethodNotFound("invalidMethod".into());
        assert_eq!(err.to_string(), "Method invalidMethod does not exists on remote.");
        assert!(err.is_recoverable());
        assert!(!err.is_protocol());
    }

    #[test]
    fn test_protocol_error_is_transparent() {
        let err: DnodeError = ProtocolError::HandshakeWrongMethod {
            line: r#"{"method": "not-methods"}"#.into(),
        }
        .into();

        assert_eq!(
            err.to_string(),
            r#"First line method must be "methods": {"method": "not-methods"}"#
        );
        assert!(err.is_protocol());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_unexpected_callback_names_both_values() {
        let err = ProtocolError::UnexpectedCallback {
            expected: 42,
            line: r#"{"method": 41}"#.into(),
        };
        assert_eq!(
            err.to_string(),
            r#"Response does not call expected callback, expected 42, got {"method": 41}"#
        );
        assert_eq!(err.line(), r#"{"method": 41}"#);
    }

    #[test]
    fn test_callback_ids_exhausted_classification() {
        let err = DnodeError::CallbackIdsExhausted;
        assert_eq!(err.to_string(), "Callback ids exhausted");
        assert!(!err.is_recoverable());
        assert!(!err.is_protocol());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_error_classification() {
        let err = DnodeError::Transport("Can't read method description from remote".into());
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Can't read method description from remote");

        let io: DnodeError = std::io::Error::from(std::io::ErrorKind::TimedOut).into();
        assert!(io.is_transport());
    }
}
