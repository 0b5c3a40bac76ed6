//! 24-bit fixed-point frequency field.
//!
//! The radio stores frequencies in 10 Hz units relative to 400 MHz, biased
//! by [`FREQUENCY_BIAS`], as three little-endian bytes.

use crate::error::{FrameError, Result};

/// Wire value of 400.00000 MHz.
pub const FREQUENCY_BIAS: u32 = 6_445_568;

/// Frequency the bias corresponds to, in MHz.
pub const BASE_MHZ: f64 = 400.0;

/// Wire units per MHz (10 Hz resolution).
pub const UNITS_PER_MHZ: f64 = 100_000.0;

const MAX_RAW: u32 = 0x00FF_FFFF;

/// Decode a 3-byte frequency field to MHz.
pub fn decode_frequency(bytes: [u8; 3]) -> f64 {
    let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]);
    (f64::from(raw) - f64::from(FREQUENCY_BIAS)) / UNITS_PER_MHZ + BASE_MHZ
}

/// Encode MHz into the 3-byte frequency field.
///
/// Rounds to the nearest 10 Hz. Fails only when the value has no 24-bit
/// representation; the radio's usable band is not checked here.
pub fn encode_frequency(mhz: f64) -> Result<[u8; 3]> {
    let raw = ((mhz - BASE_MHZ) * UNITS_PER_MHZ).round() + f64::from(FREQUENCY_BIAS);
    if !raw.is_finite() || raw < 0.0 || raw > f64::from(MAX_RAW) {
        return Err(FrameError::FrequencyOutOfRange { mhz });
    }
    let [b0, b1, b2, _] = (raw as u32).to_le_bytes();
    Ok([b0, b1, b2])
}
