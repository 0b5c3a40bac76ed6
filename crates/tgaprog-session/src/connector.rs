//! One-call read and write sessions over a [`Connector`].

use tgaprog_frame::{ChannelConfig, TrailingFrames};
use tgaprog_transport::{Connector, Transport};
use tracing::{info, info_span};

use crate::error::{Phase, SessionError, SessionFailure};
use crate::session::{Session, SessionConfig};
use crate::transaction::{prepare_write, ChannelTable};

/// Open `port`, handshake, and read the full channel table.
///
/// The transport is closed before this returns, whatever the outcome.
pub fn read_channels<C: Connector>(
    connector: &C,
    port: &str,
    config: &SessionConfig,
) -> Result<ChannelTable, SessionFailure> {
    let span = info_span!("session", port, operation = "read");
    let _guard = span.enter();

    let mut session = open(connector, port, config)?;
    handshake(&mut session)?;
    let table = session
        .read_table()
        .map_err(|err| SessionFailure::new(Phase::Read, err))?;

    info!(channels = table.channels().len(), "channel table read");
    Ok(table)
}

/// Open `port`, handshake, and write 16 channels followed by `trailing`.
///
/// Input is validated and encoded before the port is opened, so a bad
/// table or a missing baseline never touches the device.
pub fn write_channels<C: Connector>(
    connector: &C,
    port: &str,
    channels: &[ChannelConfig],
    trailing: Option<&TrailingFrames>,
    config: &SessionConfig,
) -> Result<(), SessionFailure> {
    let span = info_span!("session", port, operation = "write");
    let _guard = span.enter();

    let frames = prepare_write(channels, trailing)
        .map_err(|err| SessionFailure::new(Phase::Prepare, err))?;

    let mut session = open(connector, port, config)?;
    handshake(&mut session)?;
    session
        .write_frames(&frames)
        .map_err(|err| SessionFailure::new(Phase::Write, err))?;

    info!(records = frames.len(), "channel table written");
    Ok(())
}

fn open<C: Connector>(
    connector: &C,
    port: &str,
    config: &SessionConfig,
) -> Result<Session<C::Transport>, SessionFailure> {
    let transport = connector.connect(port).map_err(|err| {
        SessionFailure::new(Phase::Open, SessionError::TransportUnavailable(err))
    })?;
    Ok(Session::new(transport, config.clone()))
}

fn handshake<T: Transport>(session: &mut Session<T>) -> Result<(), SessionFailure> {
    match session.handshake() {
        Ok(result) => {
            info!(
                identity = %tgaprog_frame::to_hex(&result.identity),
                wake_attempts = result.wake_attempts,
                "radio in programming mode"
            );
            Ok(())
        }
        Err(err) => Err(SessionFailure::new(Phase::Handshake, err)),
    }
}
