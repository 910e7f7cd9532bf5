use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::codec::{decode_packet, Packet, MAX_BODY_LEN};
use crate::error::{FrameError, Result};

/// Reads complete packets from any `Read` stream.
///
/// Handles partial reads internally: callers always get complete packets.
/// Reads block until the full packet arrives; there is no timeout.
pub struct PacketReader<T> {
    inner: T,
    buf: [u8; MAX_BODY_LEN],
}

impl<T: Read> PacketReader<T> {
    /// Create a new packet reader.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: [0u8; MAX_BODY_LEN],
        }
    }

    /// Read the next complete packet (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached, either
    /// before the length byte or part way through the body.
    pub fn read_packet(&mut self) -> Result<Packet> {
        let body = self.read_body()?;
        decode_packet(body)
    }

    /// Read the next packet body without decoding it (blocking).
    ///
    /// The returned slice is everything after the length byte, terminator
    /// included.
    pub fn read_body(&mut self) -> Result<&[u8]> {
        let mut len = [0u8; 1];
        fill(&mut self.inner, &mut len)?;

        let len = len[0] as usize;
        if len == 0 {
            return Err(FrameError::EmptyPacket);
        }

        fill(&mut self.inner, &mut self.buf[..len])?;
        trace!(len, packet_type = %char::from(self.buf[0]), "read packet");
        Ok(&self.buf[..len])
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn fill<T: Read>(inner: &mut T, dst: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < dst.len() {
        match inner.read(&mut dst[filled..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::ReadFailed(err)),
        }
    }
    Ok(())
}
