//! Channel record codec for the TGA1 radio.
//!
//! A memory channel travels as a 17-byte record:
//! - a `57 00` marker and the slot address,
//! - receive and transmit frequencies as 24-bit fixed point,
//! - receive and transmit CTCSS tones as packed decimal digits,
//! - one control byte enumerating the option flags.
//!
//! Everything here is pure: no I/O, no state.

pub mod channel;
pub mod codec;
pub mod control;
pub mod ctcss;
pub mod error;
pub mod frequency;

pub use channel::ChannelConfig;
pub use codec::{
    decode_channel, encode_channel, from_hex, has_record_marker, read_request, slot_offset,
    to_hex, CodecConfig, RawFrame, TrailingFrames, ACK, CHANNEL_COUNT, FRAME_LEN, RECORD_MARKER,
    SLOT_COUNT, SLOT_STRIDE,
};
pub use control::{decode_control, encode_control, ChannelFlags, CONTROL_BYTES};
pub use ctcss::{decode_ctcss, encode_ctcss, Ctcss, CTCSS_OFF, STANDARD_TONES};
pub use error::{FrameError, Result};
pub use frequency::{decode_frequency, encode_frequency};
