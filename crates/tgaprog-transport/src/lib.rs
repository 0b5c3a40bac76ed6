//! Blocking byte-stream transport for TGA1 radio programming.
//!
//! The protocol engine only needs a small contract from the link:
//! - write a byte sequence,
//! - read up to N bytes, returning a short (possibly empty) read once the
//!   configured timeout expires instead of blocking forever,
//! - close.
//!
//! [`SerialTransport`] implements that contract over a serial port. The
//! [`Connector`] trait is the open side: the session layer asks a connector
//! for a fresh transport at the start of every session.

pub mod error;
pub mod serial;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use error::{Result, TransportError};
pub use serial::{available_ports, PortInfo, SerialConfig, SerialConnector, SerialTransport};
pub use traits::{Connector, Transport};

#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedTransport;
