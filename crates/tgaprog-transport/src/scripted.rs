//! In-memory transport that replays canned device replies.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    reads: usize,
    closed: bool,
}

/// A [`Transport`] driven by a queue of replies.
///
/// Each `read_up_to` pops the next reply (truncated to the requested
/// length); an exhausted queue behaves like a read timeout and returns no
/// bytes. Every `send` is recorded. Clones share the same script, so a test
/// can hand one clone to the session and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new<I, B>(replies: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        let transport = Self::default();
        transport.push_replies(replies);
        transport
    }

    /// Queue more replies behind the existing ones.
    pub fn push_replies<I, B>(&self, replies: I)
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        self.lock()
            .replies
            .extend(replies.into_iter().map(Into::into));
    }

    /// Every byte sequence sent so far, in order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.lock().sent.clone()
    }

    /// Number of `send` calls so far.
    pub fn send_count(&self) -> usize {
        self.lock().sent.len()
    }

    /// Number of `read_up_to` calls so far.
    pub fn read_count(&self) -> usize {
        self.lock().reads
    }

    /// Replies that were never consumed.
    pub fn pending_replies(&self) -> usize {
        self.lock().replies.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut script = self.lock();
        if script.closed {
            return Err(TransportError::Closed);
        }
        script.sent.push(data.to_vec());
        Ok(())
    }

    fn read_up_to(&mut self, max_len: usize) -> Result<Vec<u8>> {
        let mut script = self.lock();
        if script.closed {
            return Err(TransportError::Closed);
        }
        script.reads += 1;
        let mut reply = script.replies.pop_front().unwrap_or_default();
        reply.truncate(max_len);
        Ok(reply)
    }

    fn close(&mut self) -> Result<()> {
        self.lock().closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.lock().closed
    }
}
