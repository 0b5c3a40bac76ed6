use std::fmt;
use std::io;
use std::path::Path;

use tgaprog_session::{ErrorKind, SessionFailure};
use tgaprog_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
/// The radio answered, but not with what the protocol requires.
pub const DEVICE_REJECTED: i32 = 65;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn file_error(action: &str, path: &Path, err: io::Error) -> CliError {
    io_error(&format!("cannot {action} {}", path.display()), err)
}

pub fn json_error(path: &Path, err: serde_json::Error) -> CliError {
    let code = if err.is_io() { FAILURE } else { DATA_INVALID };
    CliError::new(code, format!("{}: {err}", path.display()))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn session_failure(port: &str, failure: SessionFailure) -> CliError {
    let code = match failure.kind() {
        ErrorKind::TransportUnavailable | ErrorKind::Transport => TRANSPORT_ERROR,
        ErrorKind::HandshakeRejected
        | ErrorKind::ProtocolDesync
        | ErrorKind::MalformedFrame
        | ErrorKind::WriteRejected => DEVICE_REJECTED,
        ErrorKind::UnsupportedFlagCombination | ErrorKind::InvalidInput => DATA_INVALID,
        ErrorKind::NoBaselineCaptured => USAGE,
        ErrorKind::InvalidState => INTERNAL,
    };
    CliError::new(code, format!("{port}: {failure}"))
}

#[cfg(test)]
mod tests {
    use tgaprog_session::{Phase, SessionError};

    use super::*;

    #[test]
    fn device_rejections_share_a_code() {
        let failure = SessionFailure::new(
            Phase::Handshake,
            SessionError::HandshakeRejected {
                step: 2,
                received: "15".to_string(),
            },
        );
        let err = session_failure("/dev/ttyUSB0", failure);
        assert_eq!(err.code, DEVICE_REJECTED);
        assert!(err.message.starts_with("/dev/ttyUSB0: handshake failed"));

        let failure = SessionFailure::new(
            Phase::Write,
            SessionError::WriteRejected {
                index: 3,
                received: String::new(),
            },
        );
        assert_eq!(session_failure("COM3", failure).code, DEVICE_REJECTED);
    }

    #[test]
    fn closed_transport_maps_to_transport_error() {
        let failure = SessionFailure::new(Phase::Read, TransportError::Closed.into());
        assert_eq!(session_failure("COM3", failure).code, TRANSPORT_ERROR);
    }

    #[test]
    fn bad_input_is_data_invalid() {
        let failure = SessionFailure::new(
            Phase::Prepare,
            SessionError::ChannelCountMismatch {
                expected: 16,
                actual: 3,
            },
        );
        assert_eq!(session_failure("COM3", failure).code, DATA_INVALID);
    }

    #[test]
    fn missing_file_is_usage() {
        let err = file_error(
            "read",
            Path::new("channels.json"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("channels.json"));
    }
}
