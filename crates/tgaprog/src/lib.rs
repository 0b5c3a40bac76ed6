//! Channel programming for TGA1 handheld radios.
//!
//! The radio keeps 16 memory channels plus two opaque trailing records in
//! 18 slots, reachable over a 9600 baud serial programming cable. This crate
//! re-exports the layers that read and write them.
//!
//! # Crate Structure
//!
//! - [`transport`]: serial link and the `Transport`/`Connector` seams
//! - [`frame`]: 17-byte record codec (frequencies, CTCSS tones, option flags)
//! - [`session`]: handshake, slot transactions, and one-call read/write sessions
//!
//! ```no_run
//! use tgaprog::session::{read_channels, SessionConfig};
//! use tgaprog::transport::SerialConnector;
//!
//! let table = read_channels(&SerialConnector::default(), "/dev/ttyUSB0", &SessionConfig::default())?;
//! for (index, channel) in table.channels().iter().enumerate() {
//!     println!("{:02} {:.5} MHz", index + 1, channel.recv_freq);
//! }
//! # Ok::<(), tgaprog::session::SessionFailure>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use tgaprog_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use tgaprog_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use tgaprog_session::*;
}
