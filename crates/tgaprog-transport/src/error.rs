/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The port could not be opened.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Serial ports could not be enumerated.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// An I/O error occurred on the open link.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport has already been closed.
    #[error("transport closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
