//! Channel table and baseline files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tgaprog_frame::{ChannelConfig, RawFrame, TrailingFrames, CHANNEL_COUNT};
use tracing::info;

use crate::exit::{file_error, json_error, CliError, CliResult, DATA_INVALID, INTERNAL};

/// Load a channel table: a JSON array of exactly 16 channel objects, each
/// of which must be encodable.
pub fn load_channels(path: &Path) -> CliResult<Vec<ChannelConfig>> {
    let channels: Vec<ChannelConfig> = load_json(path)?;
    if channels.len() != CHANNEL_COUNT {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "{}: expected {CHANNEL_COUNT} channels, got {}",
                path.display(),
                channels.len()
            ),
        ));
    }
    for (slot, channel) in channels.iter().enumerate() {
        RawFrame::encode(channel, slot).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("{}: channel {}: {err}", path.display(), slot + 1),
            )
        })?;
    }
    Ok(channels)
}

pub fn save_channels(path: &Path, channels: &[ChannelConfig]) -> CliResult<()> {
    save_json(path, channels)?;
    info!(path = %path.display(), "saved channel table");
    Ok(())
}

pub fn load_baseline(path: &Path) -> CliResult<TrailingFrames> {
    load_json(path)
}

pub fn save_baseline(path: &Path, baseline: &TrailingFrames) -> CliResult<()> {
    save_json(path, baseline)?;
    info!(path = %path.display(), "saved baseline");
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = fs::read_to_string(path).map_err(|err| file_error("read", path, err))?;
    serde_json::from_str(&text).map_err(|err| json_error(path, err))
}

fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> CliResult<()> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(INTERNAL, format!("serialize failed: {err}")))?;
    text.push('\n');
    fs::write(path, text).map_err(|err| file_error("write", path, err))
}
