//! Programming sessions for TGA1 handheld radios.
//!
//! A session opens a transport, runs the five-step handshake, performs one
//! transaction (read all 18 slots, or write them), and closes the
//! transport. [`read_channels`] and [`write_channels`] do all of that in one
//! call; [`Session`] exposes the steps for callers that need them.

pub mod connector;
pub mod error;
pub mod handshake;
pub mod session;
pub mod transaction;

pub use connector::{read_channels, write_channels};
pub use error::{ErrorKind, Phase, Result, SessionError, SessionFailure};
pub use handshake::{
    handshake, HandshakeConfig, HandshakeResult, ENTER_PROGRAM_MODE, IDENTIFY, IDENTITY_MAX_LEN,
    PROGRAM_MODE_REPLY, WAKE_SEQUENCE,
};
pub use session::{Session, SessionConfig, SessionState};
pub use transaction::{prepare_write, read_slots, write_slots, ChannelTable};
