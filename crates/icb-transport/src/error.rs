/// Errors that can occur in ICB transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server address could not be resolved.
    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        source: std::io::Error,
    },

    /// Failed to connect to the specified address.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The underlying I/O error, whatever the failing step.
    pub fn io_error(&self) -> &std::io::Error {
        match self {
            TransportError::Resolve { source, .. } | TransportError::Connect { source, .. } => {
                source
            }
            TransportError::Io(err) => err,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn io_error_reaches_the_source() {
        let err = TransportError::Connect {
            addr: "127.0.0.1:7326".to_string(),
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(err.io_error().kind(), io::ErrorKind::ConnectionRefused);

        let err = TransportError::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(err.io_error().kind(), io::ErrorKind::BrokenPipe);
    }
}
