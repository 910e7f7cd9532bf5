//! ICB packet framing.
//!
//! Every ICB packet on the wire is:
//! - A 1-byte length: the count of bytes that follow it (2..=255)
//! - A 1-byte packet type (an ASCII letter, see [`PacketType`])
//! - The payload: zero or more fields separated by `0x01`
//! - A `0x00` terminator
//!
//! The codec functions are pure. [`PacketReader`] and [`PacketWriter`] move
//! whole packets over any blocking `Read` / `Write`.

pub mod codec;
pub mod error;
pub mod packet_type;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_message, decode_packet, encode_message, encode_packet, encode_raw, join_fields,
    split_fields, Message, Packet, DELIMITER, MAX_BODY_LEN, MAX_PAYLOAD_LEN, TERMINATOR,
};
pub use error::{FrameError, Result};
pub use packet_type::{type_name, PacketType};
pub use reader::PacketReader;
pub use writer::PacketWriter;
