//! Decoded memory channel.

use serde::{Deserialize, Serialize};

use crate::control::ChannelFlags;
use crate::ctcss::Ctcss;
use crate::frequency::BASE_MHZ;

/// One memory channel's configuration.
///
/// Serializes to the import/export record shape: frequencies as numbers,
/// tones as a number or `"OFF"`, flags as `0`/`1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Receive frequency in MHz.
    pub recv_freq: f64,
    /// Transmit frequency in MHz.
    pub send_freq: f64,
    #[serde(default)]
    pub recv_ctcss: Ctcss,
    #[serde(default)]
    pub send_ctcss: Ctcss,
    #[serde(default, with = "flag")]
    pub busy_lock: bool,
    #[serde(default, with = "flag")]
    pub encryption: bool,
    #[serde(default, with = "flag")]
    pub frequency_hop: bool,
}

impl ChannelConfig {
    /// Simplex channel with no tones and no options.
    pub fn simplex(mhz: f64) -> Self {
        Self {
            recv_freq: mhz,
            send_freq: mhz,
            ..Self::default()
        }
    }

    pub fn flags(&self) -> ChannelFlags {
        ChannelFlags::new(self.busy_lock, self.encryption, self.frequency_hop)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            recv_freq: BASE_MHZ,
            send_freq: BASE_MHZ,
            recv_ctcss: Ctcss::Off,
            send_ctcss: Ctcss::Off,
            busy_lock: false,
            encryption: false,
            frequency_hop: false,
        }
    }
}

/// `0`/`1` flag fields. Input also accepts booleans and `"0"`/`"1"`.
mod flag {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }

    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("0 or 1")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(E::invalid_value(de::Unexpected::Unsigned(other), &self)),
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            match u64::try_from(v) {
                Ok(v) => self.visit_u64(v),
                Err(_) => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim() {
                "0" => Ok(false),
                "1" => Ok(true),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }
}
