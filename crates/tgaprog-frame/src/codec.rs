use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::channel::ChannelConfig;
use crate::control::{decode_control, encode_control};
use crate::ctcss::{decode_ctcss, encode_ctcss};
use crate::error::{FrameError, Result};
use crate::frequency::{decode_frequency, encode_frequency};

/// Size of one channel record on the wire.
pub const FRAME_LEN: usize = 17;

/// Every channel record starts with these bytes.
pub const RECORD_MARKER: [u8; 2] = [0x57, 0x00];

/// Command byte for a slot read request.
pub const READ_COMMAND: u8 = 0x52;

/// Trailer of the record address.
pub const ADDRESS_TERMINATOR: u8 = 0x0D;

/// Separator after each frequency field.
pub const FIELD_SEPARATOR: u8 = 0x02;

/// Device acknowledgement byte.
pub const ACK: u8 = 0x06;

/// Distance between slot addresses.
pub const SLOT_STRIDE: usize = 13;

/// Slots in the channel table: 16 channels plus two trailing records.
pub const SLOT_COUNT: usize = 18;

/// User-visible memory channels.
pub const CHANNEL_COUNT: usize = 16;

/// Byte address of a slot. Wraps modulo 256 like the device addressing.
pub fn slot_offset(slot: usize) -> u8 {
    (slot.wrapping_mul(SLOT_STRIDE) & 0xFF) as u8
}

/// `52 00 <offset> 0D`: ask the device for one slot.
pub fn read_request(slot: usize) -> [u8; 4] {
    [READ_COMMAND, 0x00, slot_offset(slot), ADDRESS_TERMINATOR]
}

/// Whether `data` starts with [`RECORD_MARKER`].
pub fn has_record_marker(data: &[u8]) -> bool {
    data.starts_with(&RECORD_MARKER)
}

/// Codec options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Decode `FF FF` tone fields as OFF. Default: `true`.
    pub ctcss_off_sentinel: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            ctcss_off_sentinel: true,
        }
    }
}

/// Decode a 17-byte channel record.
///
/// Layout:
/// ```text
/// ┌────────┬──────┬────┬─────────┬────┬─────────┬────┬─────────┬─────────┬─────────┐
/// │ 57 00  │ addr │ 0D │ rx freq │ 02 │ tx freq │ 02 │ rx tone │ tx tone │ control │
/// │ (2B)   │ (1B) │    │ (3B LE) │    │ (3B LE) │    │ (2B)    │ (2B)    │ (1B)    │
/// └────────┴──────┴────┴─────────┴────┴─────────┴────┴─────────┴─────────┴─────────┘
/// ```
/// Only the marker and the length are checked; address and separator bytes
/// are not interpreted.
pub fn decode_channel(data: &[u8], config: &CodecConfig) -> Result<ChannelConfig> {
    if !has_record_marker(data) {
        return Err(FrameError::MalformedFrame {
            reason: format!("missing record marker in {}", to_hex(data)),
        });
    }
    let record: &[u8; FRAME_LEN] = data.try_into().map_err(|_| FrameError::MalformedFrame {
        reason: format!("expected {FRAME_LEN} bytes, got {}", data.len()),
    })?;

    let flags = decode_control(record[16]);
    Ok(ChannelConfig {
        recv_freq: decode_frequency([record[4], record[5], record[6]]),
        send_freq: decode_frequency([record[8], record[9], record[10]]),
        recv_ctcss: decode_ctcss([record[12], record[13]], config.ctcss_off_sentinel),
        send_ctcss: decode_ctcss([record[14], record[15]], config.ctcss_off_sentinel),
        busy_lock: flags.busy_lock,
        encryption: flags.encryption,
        frequency_hop: flags.frequency_hop,
    })
}

/// Encode a channel as the write record for `slot` and append it to `dst`.
///
/// Nothing is appended when the channel cannot be encoded.
pub fn encode_channel(channel: &ChannelConfig, slot: usize, dst: &mut BytesMut) -> Result<()> {
    let recv_freq = encode_frequency(channel.recv_freq)?;
    let send_freq = encode_frequency(channel.send_freq)?;
    let recv_ctcss = encode_ctcss(channel.recv_ctcss)?;
    let send_ctcss = encode_ctcss(channel.send_ctcss)?;
    let control = encode_control(channel.flags())?;

    dst.reserve(FRAME_LEN);
    dst.put_slice(&RECORD_MARKER);
    dst.put_u8(slot_offset(slot));
    dst.put_u8(ADDRESS_TERMINATOR);
    dst.put_slice(&recv_freq);
    dst.put_u8(FIELD_SEPARATOR);
    dst.put_slice(&send_freq);
    dst.put_u8(FIELD_SEPARATOR);
    dst.put_slice(&recv_ctcss);
    dst.put_slice(&send_ctcss);
    dst.put_u8(control);
    Ok(())
}

/// A record exactly as exchanged on the wire, tagged with its slot.
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub slot: usize,
    pub bytes: Bytes,
}

impl RawFrame {
    pub fn new(slot: usize, bytes: impl Into<Bytes>) -> Self {
        Self {
            slot,
            bytes: bytes.into(),
        }
    }

    /// Encode `channel` as the record for `slot`.
    pub fn encode(channel: &ChannelConfig, slot: usize) -> Result<Self> {
        let mut buf = BytesMut::with_capacity(FRAME_LEN);
        encode_channel(channel, slot, &mut buf)?;
        Ok(Self::new(slot, buf.freeze()))
    }

    /// Decode the record into a channel.
    pub fn decode(&self, config: &CodecConfig) -> Result<ChannelConfig> {
        decode_channel(&self.bytes, config)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }

    /// Parse a record for `slot` from hex. The record must be
    /// [`FRAME_LEN`] bytes and carry the record marker.
    pub fn from_hex(slot: usize, hex: &str) -> Result<Self> {
        let bytes = from_hex(hex)?;
        if bytes.len() != FRAME_LEN || !has_record_marker(&bytes) {
            return Err(FrameError::MalformedFrame {
                reason: format!("slot {slot}: not a {FRAME_LEN}-byte record: {hex}"),
            });
        }
        Ok(Self::new(slot, bytes))
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("slot", &self.slot)
            .field("bytes", &format_args!("{}", self.to_hex()))
            .finish()
    }
}

/// The two records after the 16 channels, as captured by a read.
///
/// The codec does not interpret them; a write sends them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingFrames {
    frames: [RawFrame; 2],
}

impl TrailingFrames {
    /// Slots the trailing records occupy.
    pub const SLOTS: [usize; 2] = [CHANNEL_COUNT, CHANNEL_COUNT + 1];

    /// Pair two captured records. Fails unless they are the records for
    /// slots 16 and 17 in that order.
    pub fn new(first: RawFrame, second: RawFrame) -> Result<Self> {
        for (frame, slot) in [&first, &second].into_iter().zip(Self::SLOTS) {
            if frame.slot != slot {
                return Err(FrameError::MalformedFrame {
                    reason: format!("trailing record for slot {} found at {slot}", frame.slot),
                });
            }
            if frame.bytes.len() != FRAME_LEN {
                return Err(FrameError::MalformedFrame {
                    reason: format!(
                        "trailing record for slot {slot} is {} bytes",
                        frame.bytes.len()
                    ),
                });
            }
        }
        Ok(Self {
            frames: [first, second],
        })
    }

    pub fn frames(&self) -> &[RawFrame; 2] {
        &self.frames
    }
}

#[derive(Serialize, Deserialize)]
struct TrailingFramesRepr {
    slot_16: String,
    slot_17: String,
}

impl Serialize for TrailingFrames {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TrailingFramesRepr {
            slot_16: self.frames[0].to_hex(),
            slot_17: self.frames[1].to_hex(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TrailingFrames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error;

        let repr = TrailingFramesRepr::deserialize(deserializer)?;
        let [first, second] = Self::SLOTS;
        let first = RawFrame::from_hex(first, &repr.slot_16).map_err(D::Error::custom)?;
        let second = RawFrame::from_hex(second, &repr.slot_17).map_err(D::Error::custom)?;
        Self::new(first, second).map_err(D::Error::custom)
    }
}

/// Uppercase hex without separators.
pub fn to_hex(data: &[u8]) -> String {
    use fmt::Write;

    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{byte:02X}");
    }
    out
}

/// Parse hex, ignoring ASCII whitespace between digits.
pub fn from_hex(hex: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(FrameError::MalformedFrame {
            reason: format!("odd number of hex digits in '{hex}'"),
        });
    }
    digits
        .chunks_exact(2)
        .map(|pair| {
            let valid = pair.iter().all(u8::is_ascii_hexdigit);
            std::str::from_utf8(pair)
                .ok()
                .filter(|_| valid)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| FrameError::MalformedFrame {
                    reason: format!("invalid hex in '{hex}'"),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctcss::Ctcss;

    const SLOT_1_RECORD: [u8; FRAME_LEN] = [
        0x57, 0x00, 0x0D, 0x0D, 0x31, 0x8D, 0xA8, 0x02, 0x00, 0x5A, 0x62, 0x02, 0x85, 0x08, 0xFF,
        0xFF, 0x6A,
    ];

    fn slot_1_channel() -> ChannelConfig {
        ChannelConfig {
            recv_freq: 446.00625,
            send_freq: 400.0,
            recv_ctcss: Ctcss::Tone(885),
            send_ctcss: Ctcss::Off,
            busy_lock: true,
            encryption: false,
            frequency_hop: true,
        }
    }

    #[test]
    fn encode_matches_wire_layout() {
        let mut buf = BytesMut::new();
        encode_channel(&slot_1_channel(), 1, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &SLOT_1_RECORD);
    }

    #[test]
    fn decode_known_record() {
        let channel = decode_channel(&SLOT_1_RECORD, &CodecConfig::default()).unwrap();
        let expected = slot_1_channel();
        assert!((channel.recv_freq - expected.recv_freq).abs() < 1e-9);
        assert!((channel.send_freq - expected.send_freq).abs() < 1e-9);
        assert_eq!(channel.recv_ctcss, expected.recv_ctcss);
        assert_eq!(channel.send_ctcss, expected.send_ctcss);
        assert_eq!(channel.flags(), expected.flags());
    }

    #[test]
    fn decode_rejects_missing_marker() {
        let mut record = SLOT_1_RECORD;
        record[1] = 0x01;
        assert!(matches!(
            decode_channel(&record, &CodecConfig::default()),
            Err(FrameError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn decode_rejects_short_record() {
        assert!(matches!(
            decode_channel(&SLOT_1_RECORD[..12], &CodecConfig::default()),
            Err(FrameError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn unsupported_flags_leave_buffer_untouched() {
        let mut channel = slot_1_channel();
        channel.encryption = true;
        let mut buf = BytesMut::new();
        let err = encode_channel(&channel, 0, &mut buf).unwrap_err();
        assert_eq!(err, FrameError::UnsupportedFlagCombination { code: 7 });
        assert!(buf.is_empty());
    }

    #[test]
    fn slot_addressing() {
        assert_eq!(slot_offset(0), 0);
        assert_eq!(slot_offset(15), 195);
        assert_eq!(slot_offset(16), 208);
        assert_eq!(slot_offset(17), 221);
        assert_eq!(slot_offset(20), 4);
        assert_eq!(read_request(16), [0x52, 0x00, 0xD0, 0x0D]);
    }

    #[test]
    fn raw_frame_hex() {
        let frame = RawFrame::encode(&slot_1_channel(), 1).unwrap();
        assert_eq!(frame.to_hex(), "57000D0D318DA802005A62028508FFFF6A");
        let parsed = RawFrame::from_hex(1, "57 00 0D 0D 31 8D A8 02 00 5A 62 02 85 08 FF FF 6A")
            .unwrap();
        assert_eq!(parsed, frame);
        assert!(RawFrame::from_hex(1, "5700").is_err());
        assert!(RawFrame::from_hex(1, "zz").is_err());
    }

    #[test]
    fn hex_rejects_signs() {
        assert!(from_hex("+F+F").is_err());
        assert!(from_hex("-1").is_err());
        assert_eq!(from_hex("0f FF").unwrap(), vec![0x0F, 0xFF]);
    }

    #[test]
    fn trailing_frames_require_slots_16_and_17() {
        let a = RawFrame::new(16, SLOT_1_RECORD.to_vec());
        let b = RawFrame::new(17, SLOT_1_RECORD.to_vec());
        assert!(TrailingFrames::new(a.clone(), b.clone()).is_ok());
        assert!(TrailingFrames::new(b, a).is_err());
    }

    #[test]
    fn trailing_frames_serde() {
        let trailing = TrailingFrames::new(
            RawFrame::new(16, SLOT_1_RECORD.to_vec()),
            RawFrame::new(17, SLOT_1_RECORD.to_vec()),
        )
        .unwrap();
        let json = serde_json::to_string(&trailing).unwrap();
        assert!(json.contains("\"slot_16\":\"57000D0D"));
        let back: TrailingFrames = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trailing);
    }
}
