use icb_frame::FrameError;
use icb_transport::TransportError;

/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connecting to the server failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Packet-level error (size, short write, read failure, peer closed).
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The connection was closed earlier, by `close()` or a fatal error.
    #[error("connection is closed")]
    Closed,

    /// The configuration cannot produce a valid login packet.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Whether the server closed the stream.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ClientError::Frame(FrameError::ConnectionClosed))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
