//! Channel option flags and their control-byte encoding.

use tracing::trace;

use crate::error::{FrameError, Result};

/// Control bytes indexed by [`ChannelFlags::code`].
///
/// Codes 6 and 7 (busy lock together with encryption) have no entry.
pub const CONTROL_BYTES: [u8; 6] = [0xEB, 0x6B, 0xCB, 0x4B, 0xEA, 0x6A];

/// Per-channel option flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelFlags {
    pub busy_lock: bool,
    pub encryption: bool,
    pub frequency_hop: bool,
}

impl ChannelFlags {
    pub const fn new(busy_lock: bool, encryption: bool, frequency_hop: bool) -> Self {
        Self {
            busy_lock,
            encryption,
            frequency_hop,
        }
    }

    /// `busy_lock << 2 | encryption << 1 | frequency_hop`.
    pub const fn code(&self) -> u8 {
        ((self.busy_lock as u8) << 2) | ((self.encryption as u8) << 1) | self.frequency_hop as u8
    }
}

/// Encode flags into the control byte.
pub fn encode_control(flags: ChannelFlags) -> Result<u8> {
    let code = flags.code();
    CONTROL_BYTES
        .get(usize::from(code))
        .copied()
        .ok_or(FrameError::UnsupportedFlagCombination { code })
}

/// Decode a control byte.
///
/// Any byte without an explicit mapping, `0xCB` included, decodes as
/// encryption only. That is the device's reading of unknown values, not an
/// error.
pub fn decode_control(byte: u8) -> ChannelFlags {
    match byte {
        0xEA => ChannelFlags::new(true, false, false),
        0x6A => ChannelFlags::new(true, false, true),
        0x4B => ChannelFlags::new(false, true, true),
        0xEB => ChannelFlags::new(false, false, false),
        0x6B => ChannelFlags::new(false, false, true),
        other => {
            if other != 0xCB {
                trace!(byte = other, "unmapped control byte");
            }
            ChannelFlags::new(false, true, false)
        }
    }
}
