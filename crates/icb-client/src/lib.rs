//! Blocking ICB client.
//!
//! Connect with a [`ConnectionConfig`], and the login packet goes out
//! immediately. Then loop on [`Connection::read_message`], which answers
//! server pings on its own, and send with the `send_*` methods.
//! Classifying incoming message types is left to the caller.

pub mod config;
pub mod connection;
pub mod connector;
pub mod error;
pub mod login;
pub mod sink;

pub use config::{ConnectionConfig, LoginCommand, DEFAULT_GROUP, DEFAULT_HOST, DEFAULT_PORT};
pub use connection::{Closer, Connection};
pub use connector::{connect, connect_with_sink};
pub use error::{ClientError, Result};
pub use login::{login_fields, login_payload};
pub use sink::{DiagnosticSink, SinkHandle, TracingSink};
