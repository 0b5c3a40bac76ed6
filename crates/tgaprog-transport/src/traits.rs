use crate::error::Result;

/// A duplex byte link to the radio.
///
/// Reads never block past the link's timeout: once it expires, whatever has
/// arrived is returned, which may be fewer bytes than requested or none at
/// all. Callers treat a short read as a protocol mismatch.
pub trait Transport {
    /// Write the whole byte sequence.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `max_len` bytes, stopping early when the timeout expires.
    fn read_up_to(&mut self, max_len: usize) -> Result<Vec<u8>>;

    /// Release the link. Further I/O fails with
    /// [`TransportError::Closed`](crate::TransportError::Closed); closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Whether [`close`](Transport::close) has been called.
    fn is_closed(&self) -> bool;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn read_up_to(&mut self, max_len: usize) -> Result<Vec<u8>> {
        (**self).read_up_to(max_len)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// Opens a fresh [`Transport`] for a port identifier.
///
/// Every session opens its own transport and closes it when done; nothing
/// is shared between sessions.
pub trait Connector {
    type Transport: Transport;

    fn connect(&self, port: &str) -> Result<Self::Transport>;
}

impl<F, T> Connector for F
where
    F: Fn(&str) -> Result<T>,
    T: Transport,
{
    type Transport = T;

    fn connect(&self, port: &str) -> Result<T> {
        self(port)
    }
}
