/// Errors that can occur while encoding or decoding channel records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    /// The record failed structural decode.
    #[error("malformed channel record: {reason}")]
    MalformedFrame { reason: String },

    /// The flag triple maps to a control code the device table has no byte for.
    #[error("unsupported flag combination (control code {code})")]
    UnsupportedFlagCombination { code: u8 },

    /// The frequency does not fit the 24-bit wire field.
    #[error("frequency {mhz} MHz cannot be encoded")]
    FrequencyOutOfRange { mhz: f64 },

    /// The tone does not fit the packed-digit field.
    #[error("CTCSS tone {hz} cannot be encoded")]
    CtcssOutOfRange { hz: f64 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
