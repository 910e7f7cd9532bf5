use tracing::debug;

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::sink::SinkHandle;

/// Connect to the configured server and log in.
pub fn connect(config: ConnectionConfig) -> Result<Connection> {
    connect_with_sink(config, None)
}

/// Connect with an optional diagnostic sink attached.
///
/// Fails without touching the network when the config is invalid. No retry
/// on connect failure.
pub fn connect_with_sink(config: ConnectionConfig, sink: Option<SinkHandle>) -> Result<Connection> {
    config.validate()?;

    debug!(addr = %config.addr(), "connecting");
    if let Some(sink) = &sink {
        sink.record(&format!("Connecting to {}", config.addr()));
    }

    let stream = icb_transport::connect(&config.host, config.port)?;
    Connection::from_stream(stream, config, sink)
}
