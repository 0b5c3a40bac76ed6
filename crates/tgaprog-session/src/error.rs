use std::fmt;

use tgaprog_frame::FrameError;
use tgaprog_transport::TransportError;

use crate::session::SessionState;

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The port could not be opened.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(#[source] TransportError),

    /// I/O failed on an open transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A handshake step got the wrong reply (after the allowed retry).
    #[error("handshake rejected at step {step} (received [{received}])")]
    HandshakeRejected { step: u8, received: String },

    /// A slot read reply did not carry the record marker.
    #[error("protocol desync reading slot {slot} (offset {offset})")]
    ProtocolDesync { slot: usize, offset: u8 },

    /// Record encode/decode failed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The device did not acknowledge a written record.
    #[error("device rejected record {index} (received [{received}])")]
    WriteRejected { index: usize, received: String },

    /// A channel in the write input cannot be encoded.
    #[error("channel {channel}: {source}")]
    InvalidChannel {
        channel: usize,
        #[source]
        source: FrameError,
    },

    /// A write needs the trailing records from an earlier read.
    #[error("no baseline captured: read the channel table before writing")]
    NoBaselineCaptured,

    /// The write input is not a full channel table.
    #[error("expected {expected} channels, got {actual}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    /// A session operation was called out of order.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

impl SessionError {
    /// The error category, for callers that branch on the kind of failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TransportUnavailable(_) => ErrorKind::TransportUnavailable,
            Self::Transport(_) => ErrorKind::Transport,
            Self::HandshakeRejected { .. } => ErrorKind::HandshakeRejected,
            Self::ProtocolDesync { .. } => ErrorKind::ProtocolDesync,
            Self::Frame(source) | Self::InvalidChannel { source, .. } => frame_kind(source),
            Self::ChannelCountMismatch { .. } => ErrorKind::InvalidInput,
            Self::WriteRejected { .. } => ErrorKind::WriteRejected,
            Self::NoBaselineCaptured => ErrorKind::NoBaselineCaptured,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }
}

fn frame_kind(err: &FrameError) -> ErrorKind {
    match err {
        FrameError::MalformedFrame { .. } => ErrorKind::MalformedFrame,
        FrameError::UnsupportedFlagCombination { .. } => ErrorKind::UnsupportedFlagCombination,
        FrameError::FrequencyOutOfRange { .. } | FrameError::CtcssOutOfRange { .. } => {
            ErrorKind::InvalidInput
        }
    }
}

/// Flat classification of [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TransportUnavailable,
    Transport,
    HandshakeRejected,
    ProtocolDesync,
    MalformedFrame,
    UnsupportedFlagCombination,
    WriteRejected,
    NoBaselineCaptured,
    InvalidInput,
    InvalidState,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TransportUnavailable => "transport unavailable",
            Self::Transport => "transport error",
            Self::HandshakeRejected => "handshake rejected",
            Self::ProtocolDesync => "protocol desync",
            Self::MalformedFrame => "malformed frame",
            Self::UnsupportedFlagCombination => "unsupported flag combination",
            Self::WriteRejected => "write rejected",
            Self::NoBaselineCaptured => "no baseline captured",
            Self::InvalidInput => "invalid input",
            Self::InvalidState => "invalid state",
        };
        f.write_str(name)
    }
}

/// Session phase a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Validating and encoding write input, before the port is opened.
    Prepare,
    Open,
    Handshake,
    Read,
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prepare => "prepare",
            Self::Open => "open",
            Self::Handshake => "handshake",
            Self::Read => "read",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

/// A failed session: the phase and the error that ended it.
#[derive(Debug, thiserror::Error)]
#[error("{phase} failed: {error}")]
pub struct SessionFailure {
    pub phase: Phase,
    #[source]
    pub error: SessionError,
}

impl SessionFailure {
    pub fn new(phase: Phase, error: SessionError) -> Self {
        Self { phase, error }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
