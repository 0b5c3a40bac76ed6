//! Slot read and write sequences.

use tgaprog_frame::{
    has_record_marker, read_request, slot_offset, to_hex, ChannelConfig, CodecConfig, FrameError,
    RawFrame, TrailingFrames, ACK, CHANNEL_COUNT, FRAME_LEN, SLOT_COUNT,
};
use tgaprog_transport::Transport;
use tracing::{debug, warn};

use crate::error::{Result, SessionError};

/// A complete channel table read from the radio.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTable {
    channels: Vec<ChannelConfig>,
    frames: Vec<RawFrame>,
    trailing: TrailingFrames,
}

impl ChannelTable {
    /// The 16 decoded channels, channel 1 first.
    pub fn channels(&self) -> &[ChannelConfig] {
        &self.channels
    }

    /// All 18 records as read.
    pub fn frames(&self) -> &[RawFrame] {
        &self.frames
    }

    /// The baseline a following write needs.
    pub fn trailing(&self) -> &TrailingFrames {
        &self.trailing
    }

    pub fn into_parts(self) -> (Vec<ChannelConfig>, TrailingFrames) {
        (self.channels, self.trailing)
    }
}

/// Read all 18 slots.
///
/// Any reply without the record marker aborts the whole read with
/// [`SessionError::ProtocolDesync`]; there is no partial table.
pub fn read_slots<T: Transport + ?Sized>(
    transport: &mut T,
    codec: &CodecConfig,
) -> Result<ChannelTable> {
    let mut frames = Vec::with_capacity(SLOT_COUNT);

    for slot in 0..SLOT_COUNT {
        let request = read_request(slot);
        transport.send(&request)?;
        let reply = transport.read_up_to(FRAME_LEN)?;
        debug!(slot, sent = %to_hex(&request), received = %to_hex(&reply), "slot read");

        if !has_record_marker(&reply) {
            warn!(slot, received = %to_hex(&reply), "unexpected slot reply");
            return Err(SessionError::ProtocolDesync {
                slot,
                offset: slot_offset(slot),
            });
        }
        if reply.len() != FRAME_LEN {
            return Err(FrameError::MalformedFrame {
                reason: format!("slot {slot}: short record of {} bytes", reply.len()),
            }
            .into());
        }
        frames.push(RawFrame::new(slot, reply));
    }

    let channels = frames[..CHANNEL_COUNT]
        .iter()
        .map(|frame| frame.decode(codec))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let trailing = TrailingFrames::new(
        frames[CHANNEL_COUNT].clone(),
        frames[CHANNEL_COUNT + 1].clone(),
    )?;

    Ok(ChannelTable {
        channels,
        frames,
        trailing,
    })
}

/// Encode 16 channels and append the trailing records: the exact 18
/// records a write sends, in order.
///
/// Runs before any I/O so that unencodable input never reaches the radio.
pub fn prepare_write(
    channels: &[ChannelConfig],
    trailing: Option<&TrailingFrames>,
) -> Result<Vec<RawFrame>> {
    let trailing = trailing.ok_or(SessionError::NoBaselineCaptured)?;
    if channels.len() != CHANNEL_COUNT {
        return Err(SessionError::ChannelCountMismatch {
            expected: CHANNEL_COUNT,
            actual: channels.len(),
        });
    }

    let mut frames = channels
        .iter()
        .enumerate()
        .map(|(slot, channel)| {
            RawFrame::encode(channel, slot).map_err(|source| SessionError::InvalidChannel {
                channel: slot + 1,
                source,
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    frames.extend(trailing.frames().iter().cloned());
    Ok(frames)
}

/// Send prepared records, requiring an ACK after each.
///
/// Stops at the first record the radio does not acknowledge; later records
/// are never sent.
pub fn write_slots<T: Transport + ?Sized>(transport: &mut T, frames: &[RawFrame]) -> Result<()> {
    for (index, frame) in frames.iter().enumerate() {
        transport.send(frame.as_bytes())?;
        let reply = transport.read_up_to(1)?;
        debug!(index, sent = %frame.to_hex(), received = %to_hex(&reply), "slot write");

        if reply != [ACK] {
            warn!(index, received = %to_hex(&reply), "record not acknowledged");
            return Err(SessionError::WriteRejected {
                index,
                received: to_hex(&reply),
            });
        }
    }
    Ok(())
}
