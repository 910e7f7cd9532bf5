use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::IcbStream;

/// Connect to an ICB server by host name and port (blocking).
///
/// Every resolved address is tried in order; the error from the last attempt
/// is returned when none succeed. No retry loop beyond that.
pub fn connect(host: &str, port: u16) -> Result<IcbStream> {
    let addr = format!("{host}:{port}");
    let candidates: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            addr: addr.clone(),
            source,
        })?
        .collect();

    let mut last_err = None;
    for candidate in candidates {
        match TcpStream::connect(candidate) {
            Ok(stream) => {
                debug!(%addr, resolved = %candidate, "connected to icb server");
                return Ok(IcbStream::from_tcp(stream));
            }
            Err(err) => {
                debug!(%addr, resolved = %candidate, error = %err, "connect attempt failed");
                last_err = Some(err);
            }
        }
    }

    Err(TransportError::Connect {
        addr,
        source: last_err.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "host resolved to no addresses",
            )
        }),
    })
}

/// Connect to an already resolved socket address (blocking).
pub fn connect_addr(addr: SocketAddr) -> Result<IcbStream> {
    let stream = TcpStream::connect(addr).map_err(|source| TransportError::Connect {
        addr: addr.to_string(),
        source,
    })?;
    debug!(%addr, "connected to icb server");
    Ok(IcbStream::from_tcp(stream))
}
