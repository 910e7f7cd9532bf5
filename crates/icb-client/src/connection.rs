use std::net::SocketAddr;
use std::sync::Arc;

use icb_frame::{FrameError, Message, PacketReader, PacketType, PacketWriter, DELIMITER};
use icb_transport::IcbStream;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{ClientError, Result};
use crate::login::login_payload;
use crate::sink::{printable, SinkHandle};

/// A logged-in ICB session over one TCP socket.
///
/// Every operation blocks on the socket. Sends take `&mut self`, so at most
/// one frame is in flight at a time. To interrupt a blocked
/// [`read_message`](Self::read_message) from another thread, take a
/// [`Closer`] first.
pub struct Connection {
    io: Option<ConnectionIo>,
    config: ConnectionConfig,
    sink: Option<SinkHandle>,
    peer_addr: Option<SocketAddr>,
}

struct ConnectionIo {
    reader: PacketReader<IcbStream>,
    writer: PacketWriter<IcbStream>,
}

/// Shuts a connection's socket down from any thread.
///
/// A `read_message` blocked on the connection fails once the socket is
/// shut down. Closing twice is harmless.
#[derive(Debug, Clone)]
pub struct Closer {
    stream: Arc<IcbStream>,
}

impl Closer {
    pub fn close(&self) -> Result<()> {
        self.stream.shutdown()?;
        Ok(())
    }
}

impl Connection {
    /// Log in over an already connected stream.
    ///
    /// The connection is usable as soon as the login packet is written; the
    /// server's acknowledgment arrives later through `read_message`.
    pub fn from_stream(
        stream: IcbStream,
        config: ConnectionConfig,
        sink: Option<SinkHandle>,
    ) -> Result<Self> {
        config.validate()?;

        let reader_stream = stream.try_clone()?;
        let peer_addr = stream.peer_addr().ok();
        let mut conn = Self {
            io: Some(ConnectionIo {
                reader: PacketReader::new(reader_stream),
                writer: PacketWriter::new(stream),
            }),
            config,
            sink,
            peer_addr,
        };

        conn.login()?;
        Ok(conn)
    }

    fn login(&mut self) -> Result<()> {
        debug!(
            user = %self.config.user,
            nick = %self.config.nick(),
            group = %self.config.group,
            cmd = %self.config.cmd,
            "sending login"
        );
        let payload = login_payload(&self.config);
        self.send_packet(PacketType::Login.code(), &payload)
    }

    /// Send an open message to the current group.
    pub fn send_open(&mut self, text: &str) -> Result<()> {
        self.send_packet(PacketType::Open.code(), text.as_bytes())
    }

    /// Send a private message (the server's `m` command).
    pub fn send_private(&mut self, nick: &str, message: &str) -> Result<()> {
        self.send_command("m", &[nick, message])
    }

    /// Send a server command.
    ///
    /// The payload is `cmd`, the field delimiter, then `args` joined by single
    /// spaces: the server sees one argument string, not separate fields.
    pub fn send_command<S: AsRef<str>>(&mut self, cmd: &str, args: &[S]) -> Result<()> {
        let mut payload = Vec::with_capacity(cmd.len() + 1 + args.len() * 8);
        payload.extend_from_slice(cmd.as_bytes());
        payload.push(DELIMITER);
        for (idx, arg) in args.iter().enumerate() {
            if idx > 0 {
                payload.push(b' ');
            }
            payload.extend_from_slice(arg.as_ref().as_bytes());
        }
        self.send_packet(PacketType::Command.code(), &payload)
    }

    /// Answer a ping. `read_message` does this automatically.
    pub fn send_pong(&mut self) -> Result<()> {
        self.send_packet(PacketType::Pong.code(), b"")
    }

    /// Send a packet body assembled by the caller: a type byte followed by
    /// the payload. Only the terminator and length prefix are added.
    pub fn send_raw(&mut self, body: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.record("SEND", &[body]);
        let io = self.io_mut()?;
        let result = io.writer.send_raw(body);
        self.finish_io(result).map(|_| ())
    }

    /// Read the next message from the server (blocking, no timeout).
    ///
    /// A ping is answered with a pong before it is returned, so callers see
    /// every ping but never have to reply themselves. A failed pong is
    /// reported as this call's error.
    pub fn read_message(&mut self) -> Result<Message> {
        let io = self.io_mut()?;
        let result = io.reader.read_packet();
        let packet = self.finish_io(result)?;

        self.record(
            "RECV",
            &[std::slice::from_ref(&packet.packet_type), packet.payload.as_ref()],
        );

        let message = packet.into_message();
        if message.is(PacketType::Ping) {
            debug!("answering server ping");
            self.send_pong()?;
        }
        Ok(message)
    }

    /// Release the socket. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(io) = self.io.take() {
            if let Err(err) = io.writer.get_ref().shutdown() {
                debug!(error = %err, "socket shutdown failed during close");
            }
            info!(addr = %self.config.addr(), "connection closed");
        }
    }

    /// A handle that can close this connection from another thread.
    pub fn closer(&self) -> Result<Closer> {
        let io = self.io.as_ref().ok_or(ClientError::Closed)?;
        let stream = io.writer.get_ref().try_clone()?;
        Ok(Closer {
            stream: Arc::new(stream),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.io.is_none()
    }

    /// The configuration this connection logged in with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Server address, when the socket reported one at connect time.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    fn send_packet(&mut self, packet_type: u8, payload: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.record("SEND", &[std::slice::from_ref(&packet_type), payload]);
        let io = self.io_mut()?;
        let result = io.writer.send(packet_type, payload);
        self.finish_io(result).map(|_| ())
    }

    /// One sink line per packet; the size counts the terminator.
    fn record(&self, direction: &str, parts: &[&[u8]]) {
        if let Some(sink) = &self.sink {
            let body = parts.concat();
            sink.record(&format!(
                "{direction}: {}b -- {}\\0",
                body.len() + 1,
                printable(&body)
            ));
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        Ok(())
    }

    fn io_mut(&mut self) -> Result<&mut ConnectionIo> {
        self.io.as_mut().ok_or(ClientError::Closed)
    }

    /// Close on fatal frame errors before handing the error back.
    fn finish_io<T>(&mut self, result: std::result::Result<T, FrameError>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                if err.is_fatal() {
                    debug!(error = %err, "fatal i/o error, closing connection");
                    self.close();
                }
                Err(err.into())
            }
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .field("peer_addr", &self.peer_addr)
            .field("closed", &self.is_closed())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
