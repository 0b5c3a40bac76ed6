use bytes::Bytes;
use tgaprog_frame::{to_hex, ACK};
use tgaprog_transport::Transport;
use tracing::{debug, warn};

use crate::error::{Result, SessionError};

/// Step 1: `02 "TGS1RAM"` wakes the radio into programming mode.
pub const WAKE_SEQUENCE: [u8; 8] = [0x02, b'T', b'G', b'S', b'1', b'R', b'A', b'M'];

/// Step 2 request.
pub const ENTER_PROGRAM_MODE: [u8; 1] = [0x02];

/// Step 2 expected reply.
pub const PROGRAM_MODE_REPLY: [u8; 8] = [ACK, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Step 4 request: ask the radio to identify itself.
pub const IDENTIFY: [u8; 1] = [0x05];

/// Longest identity reply read at step 4.
pub const IDENTITY_MAX_LEN: usize = 7;

const ACK_FRAME: [u8; 1] = [ACK];

/// Configuration for the opening handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// Extra attempts for the wake sequence (step 1). No other step retries.
    pub wake_retries: u32,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self { wake_retries: 1 }
    }
}

/// Result of a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResult {
    /// Whatever the radio answered to the identify request.
    pub identity: Bytes,
    /// Wake sequence attempts used (1 when the first one was acknowledged).
    pub wake_attempts: u32,
}

/// Run the five-step opening handshake.
///
/// | step | send | expect |
/// |---|---|---|
/// | 1 | `02 54 47 53 31 52 41 4D` | `06` (retried per config) |
/// | 2 | `02` | `06 00 00 00 00 00 00 00` |
/// | 3 | `06` | `06` |
/// | 4 | `05` | 1..=7 bytes of identity |
/// | 5 | `06` | `06` |
///
/// Any mismatch fails with [`SessionError::HandshakeRejected`]; the caller
/// is responsible for closing the transport.
pub fn handshake<T: Transport + ?Sized>(
    transport: &mut T,
    config: &HandshakeConfig,
) -> Result<HandshakeResult> {
    let wake_attempts = wake(transport, config.wake_retries)?;

    let reply = exchange(transport, 2, &ENTER_PROGRAM_MODE, PROGRAM_MODE_REPLY.len())?;
    expect(2, &reply, &PROGRAM_MODE_REPLY)?;

    let reply = exchange(transport, 3, &ACK_FRAME, 1)?;
    expect(3, &reply, &ACK_FRAME)?;

    let identity = exchange(transport, 4, &IDENTIFY, IDENTITY_MAX_LEN)?;
    if identity.is_empty() {
        return Err(rejected(4, &identity));
    }

    let reply = exchange(transport, 5, &ACK_FRAME, 1)?;
    expect(5, &reply, &ACK_FRAME)?;

    debug!(identity = %to_hex(&identity), wake_attempts, "handshake complete");
    Ok(HandshakeResult {
        identity: Bytes::from(identity),
        wake_attempts,
    })
}

fn wake<T: Transport + ?Sized>(transport: &mut T, retries: u32) -> Result<u32> {
    let attempts = retries.saturating_add(1);
    let mut last = Vec::new();
    for attempt in 1..=attempts {
        last = exchange(transport, 1, &WAKE_SEQUENCE, 1)?;
        if last == ACK_FRAME {
            return Ok(attempt);
        }
        if attempt < attempts {
            warn!(attempt, received = %to_hex(&last), "wake sequence not acknowledged, retrying");
        }
    }
    Err(rejected(1, &last))
}

fn exchange<T: Transport + ?Sized>(
    transport: &mut T,
    step: u8,
    request: &[u8],
    reply_len: usize,
) -> Result<Vec<u8>> {
    transport.send(request)?;
    let reply = transport.read_up_to(reply_len)?;
    debug!(
        step,
        sent = %to_hex(request),
        received = %to_hex(&reply),
        "handshake exchange"
    );
    Ok(reply)
}

fn expect(step: u8, reply: &[u8], expected: &[u8]) -> Result<()> {
    if reply == expected {
        Ok(())
    } else {
        Err(rejected(step, reply))
    }
}

fn rejected(step: u8, received: &[u8]) -> SessionError {
    SessionError::HandshakeRejected {
        step,
        received: to_hex(received),
    }
}
