//! Protocol module - wire messages and validation.
//!
//! Every message is a single JSON object on its own `\n`-terminated line:
//! - handshake (remote → local): `{"method":"methods","arguments":[{<name>:…}]}`
//! - handshake ack (local → remote): `{"method":"methods"}`
//! - call (local → remote): `{"method":<name>,"arguments":[…],"callbacks":{"<id>":[<argc>]}}`
//! - call response (remote → local): `{"method":<id>,"arguments":[…]}`
//!
//! Inbound lines go through a fixed validation pipeline that stops at the
//! first failing rule and reports it as a [`ProtocolError`](crate::error::ProtocolError).

mod handshake;
mod message;
mod response;

pub use handshake::{parse_handshake, MethodTable};
pub use message::{encode_line, strip_terminator, CallRequest, HandshakeAck, InboundMessage, METHODS};
pub use response::parse_response;
