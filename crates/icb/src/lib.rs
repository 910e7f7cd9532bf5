//! ICB (Internet Citizen's Band) chat protocol client.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP stream to the server
//! - [`frame`]: Packet codec (length prefix, type byte, `0x01` fields, `0x00` terminator)
//! - [`client`]: Connection, login and keepalive (behind `client` feature)

/// Re-export transport types.
pub mod transport {
    pub use icb_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use icb_frame::*;
}

/// Re-export client types (requires `client` feature).
#[cfg(feature = "client")]
pub mod client {
    pub use icb_client::*;
}
