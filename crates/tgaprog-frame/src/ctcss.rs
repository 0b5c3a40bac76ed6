//! CTCSS tone values and the 2-byte packed-digit field.
//!
//! Each byte holds two decimal digits, one per nibble. The nibbles are used
//! as plain numbers when decoding, so out-of-range nibbles still produce a
//! value instead of an error.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FrameError, Result};

/// Wire value for "no tone".
pub const CTCSS_OFF: [u8; 2] = [0xFF, 0xFF];

/// Standard CTCSS tones in tenths of a hertz.
pub const STANDARD_TONES: [u16; 38] = [
    670, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109, 1148, 1188,
    1230, 1273, 1318, 1365, 1413, 1462, 1514, 1567, 1622, 1679, 1738, 1799, 1862, 1928, 2035,
    2107, 2181, 2257, 2336, 2418, 2503,
];

/// Largest value the packed-digit field can carry.
const MAX_ENCODABLE_TENTHS: u16 = 15_999;

/// A squelch tone setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ctcss {
    /// No tone.
    #[default]
    Off,
    /// Tone in tenths of a hertz (`1230` is 123.0).
    Tone(u16),
}

impl Ctcss {
    /// Build from a decimal tone value. `0` means [`Ctcss::Off`].
    pub fn from_hz(hz: f64) -> Result<Self> {
        let tenths = (hz * 10.0).round();
        if !tenths.is_finite() || tenths < 0.0 || tenths > f64::from(u16::MAX) {
            return Err(FrameError::CtcssOutOfRange { hz });
        }
        Ok(Self::from_tenths(tenths as u16))
    }

    /// Build from tenths of a hertz. `0` means [`Ctcss::Off`].
    pub fn from_tenths(tenths: u16) -> Self {
        if tenths == 0 {
            Self::Off
        } else {
            Self::Tone(tenths)
        }
    }

    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    pub fn tenths(&self) -> Option<u16> {
        match *self {
            Self::Off => None,
            Self::Tone(tenths) => Some(tenths),
        }
    }

    pub fn hz(&self) -> Option<f64> {
        self.tenths().map(|t| f64::from(t) / 10.0)
    }

    /// Whether this is one of [`STANDARD_TONES`].
    pub fn is_standard(&self) -> bool {
        self.tenths()
            .is_some_and(|t| STANDARD_TONES.contains(&t))
    }
}

/// Decode a CTCSS field. With `off_sentinel`, `FF FF` is [`Ctcss::Off`];
/// every other field, and `FF FF` without the sentinel, decodes
/// arithmetically. `00 00` is `Tone(0)`, not OFF.
pub fn decode_ctcss(field: [u8; 2], off_sentinel: bool) -> Ctcss {
    if off_sentinel && field == CTCSS_OFF {
        return Ctcss::Off;
    }
    let [b0, b1] = field.map(u16::from);
    Ctcss::Tone((b0 % 16) + (b0 / 16) * 10 + (b1 % 16) * 100 + (b1 / 16) * 1000)
}

/// Encode a CTCSS field. OFF and a zero tone both encode as `FF FF`.
///
/// The low digit pair goes in the first byte and the high pair in the
/// second; the device misreads the tone if they are swapped.
pub fn encode_ctcss(tone: Ctcss) -> Result<[u8; 2]> {
    let tenths = match tone {
        Ctcss::Off | Ctcss::Tone(0) => return Ok(CTCSS_OFF),
        Ctcss::Tone(tenths) => tenths,
    };
    if tenths > MAX_ENCODABLE_TENTHS {
        return Err(FrameError::CtcssOutOfRange {
            hz: f64::from(tenths) / 10.0,
        });
    }
    let high = tenths / 100;
    let low = tenths % 100;
    Ok([pack_pair(low), pack_pair(high)])
}

fn pack_pair(pair: u16) -> u8 {
    // pair <= 159, so the result is at most 0xF9
    ((pair % 10) + (pair / 10) * 16) as u8
}

impl fmt::Display for Ctcss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hz() {
            None => f.write_str("OFF"),
            Some(hz) => write!(f, "{hz:.1}"),
        }
    }
}

impl FromStr for Ctcss {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("off") {
            return Ok(Self::Off);
        }
        let hz: f64 = s.parse().map_err(|_| FrameError::MalformedFrame {
            reason: format!("invalid CTCSS value '{s}'"),
        })?;
        Self::from_hz(hz)
    }
}

impl Serialize for Ctcss {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.hz() {
            None => serializer.serialize_str("OFF"),
            Some(hz) => serializer.serialize_f64(hz),
        }
    }
}

impl<'de> Deserialize<'de> for Ctcss {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(CtcssVisitor)
    }
}

struct CtcssVisitor;

impl<'de> Visitor<'de> for CtcssVisitor {
    type Value = Ctcss;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a tone number or \"OFF\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Ctcss, E> {
        Ctcss::from_hz(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Ctcss, E> {
        self.visit_f64(v as f64)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Ctcss, E> {
        self.visit_f64(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Ctcss, E> {
        v.parse().map_err(E::custom)
    }
}
