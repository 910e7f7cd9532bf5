use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{encode_message, encode_packet, encode_raw, Packet};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Writes complete packets to any `Write` stream.
///
/// Each packet is encoded in full before anything touches the stream, so an
/// oversized packet never produces a partial frame.
pub struct PacketWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> PacketWriter<T> {
    /// Create a new packet writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a complete packet (blocking).
    pub fn write_packet(&mut self, packet: &Packet) -> Result<usize> {
        self.send(packet.packet_type, packet.payload.as_ref())
    }

    /// Encode and send a payload with the given type byte.
    ///
    /// Returns the number of bytes put on the wire.
    pub fn send(&mut self, packet_type: u8, payload: &[u8]) -> Result<usize> {
        self.buf.clear();
        encode_packet(packet_type, payload, &mut self.buf)?;
        self.write_buffered()
    }

    /// Encode and send a type character with delimiter-joined fields.
    pub fn send_message<S: AsRef<str>>(
        &mut self,
        packet_type: char,
        fields: &[S],
    ) -> Result<usize> {
        self.buf.clear();
        encode_message(packet_type, fields, &mut self.buf)?;
        self.write_buffered()
    }

    /// Send an already assembled body (type byte followed by payload).
    pub fn send_raw(&mut self, body: &[u8]) -> Result<usize> {
        self.buf.clear();
        encode_raw(body, &mut self.buf)?;
        self.write_buffered()
    }

    /// The most recently encoded frame, length byte included.
    pub fn last_frame(&self) -> &[u8] {
        &self.buf
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::WriteFailed(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn write_buffered(&mut self) -> Result<usize> {
        let expected = self.buf.len();
        let mut written = 0usize;
        while written < expected {
            match self.inner.write(&self.buf[written..]) {
                Ok(0) => return Err(FrameError::ShortWrite { written, expected }),
                Ok(n) => written += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::WriteFailed(err)),
            }
        }

        self.flush()?;
        trace!(len = written, "wrote packet");
        Ok(written)
    }
}
