/// Errors that can occur during packet encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The encoded packet body would exceed the one-byte length prefix.
    #[error("packet too large ({size} bytes, max {max})")]
    PacketTooLarge { size: usize, max: usize },

    /// The packet type is not a single-byte ASCII character.
    #[error("invalid packet type {0:?} (must be ASCII)")]
    InvalidPacketType(char),

    /// A zero-length packet was read or requested.
    #[error("empty packet (no type byte)")]
    EmptyPacket,

    /// The stream accepted fewer bytes than the frame length.
    #[error("short write ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// Writing or flushing the stream failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// Reading from the stream failed.
    #[error("read failed: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// The connection was closed before a complete packet was received.
    #[error("connection closed (incomplete packet)")]
    ConnectionClosed,
}

impl FrameError {
    /// Whether the error leaves the underlying stream unusable.
    ///
    /// Size and type errors are raised before any I/O and are not fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FrameError::ShortWrite { .. }
                | FrameError::WriteFailed(_)
                | FrameError::ReadFailed(_)
                | FrameError::ConnectionClosed
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
