//! TCP transport for ICB clients.
//!
//! This is the lowest layer of the workspace. It opens the single TCP
//! connection an ICB session runs over and hands it up as an [`IcbStream`]
//! (`Read + Write`). Everything else builds on top of that type.

pub mod error;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use tcp::{connect, connect_addr};
pub use traits::IcbStream;
