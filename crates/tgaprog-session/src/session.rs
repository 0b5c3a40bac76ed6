use std::fmt;

use tgaprog_frame::{ChannelConfig, CodecConfig, RawFrame, TrailingFrames};
use tgaprog_transport::Transport;
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, Result, SessionError};
use crate::handshake::{handshake, HandshakeConfig, HandshakeResult};
use crate::transaction::{prepare_write, read_slots, write_slots, ChannelTable};

/// Where a session is in its lifecycle.
///
/// `Idle → Handshaking → Transacting → Complete | Aborted`. Both terminal
/// states have closed the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Handshake running, or done and waiting for a transaction.
    Handshaking,
    Transacting,
    Complete,
    Aborted(ErrorKind),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Aborted(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Handshaking => f.write_str("handshaking"),
            Self::Transacting => f.write_str("transacting"),
            Self::Complete => f.write_str("complete"),
            Self::Aborted(kind) => write!(f, "aborted ({kind})"),
        }
    }
}

/// Configuration for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub handshake: HandshakeConfig,
    pub codec: CodecConfig,
}

/// One handshake plus one transaction over an exclusively owned transport.
///
/// The transport is closed when the session completes, aborts, or is
/// dropped. A new session always handshakes again.
pub struct Session<T: Transport> {
    transport: T,
    state: SessionState,
    config: SessionConfig,
    handshake: Option<HandshakeResult>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            state: SessionState::Idle,
            config,
            handshake: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handshake details, once the handshake succeeded.
    pub fn handshake_result(&self) -> Option<&HandshakeResult> {
        self.handshake.as_ref()
    }

    /// Run the opening handshake. Only valid on an idle session.
    pub fn handshake(&mut self) -> Result<&HandshakeResult> {
        if self.state != SessionState::Idle {
            return Err(self.invalid_state("handshake"));
        }
        self.state = SessionState::Handshaking;

        match handshake(&mut self.transport, &self.config.handshake) {
            Ok(result) => Ok(&*self.handshake.insert(result)),
            Err(err) => Err(self.abort(err)),
        }
    }

    /// Read the full channel table.
    pub fn read_table(&mut self) -> Result<ChannelTable> {
        self.begin_transaction("read")?;
        let result = read_slots(&mut self.transport, &self.config.codec);
        self.finish(result)
    }

    /// Encode `channels` and write them followed by the trailing records.
    pub fn write_table(
        &mut self,
        channels: &[ChannelConfig],
        trailing: Option<&TrailingFrames>,
    ) -> Result<()> {
        self.begin_transaction("write")?;
        let result = prepare_write(channels, trailing)
            .and_then(|frames| write_slots(&mut self.transport, &frames));
        self.finish(result)
    }

    /// Write records prepared by [`prepare_write`].
    pub fn write_frames(&mut self, frames: &[RawFrame]) -> Result<()> {
        self.begin_transaction("write")?;
        let result = write_slots(&mut self.transport, frames);
        self.finish(result)
    }

    /// Close the transport. Sessions that have not finished are aborted.
    pub fn close(&mut self) {
        if !self.state.is_terminal() && self.state != SessionState::Idle {
            self.state = SessionState::Aborted(ErrorKind::InvalidState);
        }
        self.close_transport();
    }

    fn begin_transaction(&mut self, operation: &'static str) -> Result<()> {
        if self.state != SessionState::Handshaking || self.handshake.is_none() {
            return Err(self.invalid_state(operation));
        }
        self.state = SessionState::Transacting;
        Ok(())
    }

    fn finish<R>(&mut self, result: Result<R>) -> Result<R> {
        match result {
            Ok(value) => {
                self.state = SessionState::Complete;
                self.close_transport();
                info!("session complete");
                Ok(value)
            }
            Err(err) => Err(self.abort(err)),
        }
    }

    fn abort(&mut self, err: SessionError) -> SessionError {
        warn!(error = %err, state = %self.state, "session aborted");
        self.state = SessionState::Aborted(err.kind());
        self.close_transport();
        err
    }

    fn invalid_state(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            state: self.state,
        }
    }

    fn close_transport(&mut self) {
        if self.transport.is_closed() {
            return;
        }
        match self.transport.close() {
            Ok(()) => debug!("transport closed"),
            Err(err) => warn!(error = %err, "failed to close transport"),
        }
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.close_transport();
    }
}

impl<T: Transport> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("handshake", &self.handshake)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use tgaprog_frame::{ACK, CHANNEL_COUNT, SLOT_COUNT};
    use tgaprog_transport::ScriptedTransport;

    use super::*;
    use crate::handshake::PROGRAM_MODE_REPLY;
    use crate::transaction::tests::{sample_channel, table_replies};

    fn handshake_replies() -> Vec<Vec<u8>> {
        vec![
            vec![ACK],
            PROGRAM_MODE_REPLY.to_vec(),
            vec![ACK],
            b"TGA1".to_vec(),
            vec![ACK],
        ]
    }

    #[test]
    fn read_session_completes_and_closes() {
        let probe = ScriptedTransport::new(handshake_replies());
        probe.push_replies(table_replies());
        let mut session = Session::new(probe.clone(), SessionConfig::default());

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.handshake_result().is_none());
        session.handshake().unwrap();
        assert_eq!(session.state(), SessionState::Handshaking);
        assert_eq!(
            session.handshake_result().map(|r| &r.identity[..]),
            Some(b"TGA1".as_slice())
        );

        let table = session.read_table().unwrap();
        assert_eq!(table.channels().len(), CHANNEL_COUNT);
        assert_eq!(session.state(), SessionState::Complete);
        assert!(probe.is_closed());
    }

    #[test]
    fn transaction_before_handshake_is_rejected() {
        let probe = ScriptedTransport::new(table_replies());
        let mut session = Session::new(probe.clone(), SessionConfig::default());

        let err = session.read_table().unwrap_err();

        assert!(matches!(
            err,
            SessionError::InvalidState {
                operation: "read",
                state: SessionState::Idle
            }
        ));
        assert_eq!(probe.send_count(), 0);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn second_transaction_is_rejected() {
        let probe = ScriptedTransport::new(handshake_replies());
        probe.push_replies(table_replies());
        let mut session = Session::new(probe.clone(), SessionConfig::default());
        session.handshake().unwrap();
        session.read_table().unwrap();

        let err = session.read_table().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn failed_handshake_aborts_and_closes() {
        let probe = ScriptedTransport::new([vec![0x01], vec![0x01]]);
        let mut session = Session::new(probe.clone(), SessionConfig::default());

        assert!(session.handshake().is_err());

        assert_eq!(
            session.state(),
            SessionState::Aborted(ErrorKind::HandshakeRejected)
        );
        assert!(probe.is_closed());
    }

    #[test]
    fn write_session_sends_eighteen_records() {
        let read_probe = ScriptedTransport::new(handshake_replies());
        read_probe.push_replies(table_replies());
        let mut reader = Session::new(read_probe, SessionConfig::default());
        reader.handshake().unwrap();
        let (_, trailing) = reader.read_table().unwrap().into_parts();

        let write_probe = ScriptedTransport::new(handshake_replies());
        write_probe.push_replies(vec![vec![ACK]; SLOT_COUNT]);
        let mut writer = Session::new(write_probe.clone(), SessionConfig::default());
        writer.handshake().unwrap();
        let channels: Vec<_> = (0..CHANNEL_COUNT).map(sample_channel).collect();
        writer.write_table(&channels, Some(&trailing)).unwrap();

        assert_eq!(writer.state(), SessionState::Complete);
        assert_eq!(write_probe.send_count(), 5 + SLOT_COUNT);
        assert!(write_probe.is_closed());
    }

    #[test]
    fn write_without_baseline_aborts_before_sending() {
        let probe = ScriptedTransport::new(handshake_replies());
        let mut session = Session::new(probe.clone(), SessionConfig::default());
        session.handshake().unwrap();

        let channels = vec![ChannelConfig::default(); CHANNEL_COUNT];
        let err = session.write_table(&channels, None).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoBaselineCaptured);
        assert_eq!(probe.send_count(), 5);
        assert!(probe.is_closed());
    }

    #[test]
    fn drop_closes_transport() {
        let probe = ScriptedTransport::new(handshake_replies());
        {
            let mut session = Session::new(probe.clone(), SessionConfig::default());
            session.handshake().unwrap();
        }
        assert!(probe.is_closed());
    }

    #[test]
    fn explicit_close_mid_session_aborts() {
        let probe = ScriptedTransport::new(handshake_replies());
        let mut session = Session::new(probe.clone(), SessionConfig::default());
        session.handshake().unwrap();

        session.close();

        assert!(matches!(session.state(), SessionState::Aborted(_)));
        assert!(probe.is_closed());
    }
}
