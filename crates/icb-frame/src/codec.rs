use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::packet_type::PacketType;

/// Separator between fields inside a payload.
pub const DELIMITER: u8 = 0x01;

/// Final byte of every packet body.
pub const TERMINATOR: u8 = 0x00;

/// Largest body (type + payload + terminator) the length byte can describe.
pub const MAX_BODY_LEN: usize = u8::MAX as usize;

/// Largest payload for a one-byte packet type.
pub const MAX_PAYLOAD_LEN: usize = MAX_BODY_LEN - 2;

/// A raw ICB packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// The packet type byte.
    pub packet_type: u8,
    /// Bytes between the type byte and the terminator.
    pub payload: Bytes,
}

impl Packet {
    /// Create a new packet.
    pub fn new(packet_type: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            packet_type,
            payload: payload.into(),
        }
    }

    /// The known packet type, if the type byte is one.
    pub fn kind(&self) -> Option<PacketType> {
        PacketType::from_code(self.packet_type)
    }

    /// The total wire size of this packet (length byte + body).
    pub fn wire_size(&self) -> usize {
        1 + self.body_len()
    }

    /// Value of the length byte: type + payload + terminator.
    pub fn body_len(&self) -> usize {
        self.payload.len() + 2
    }

    /// Split the payload into fields.
    pub fn fields(&self) -> Vec<String> {
        split_fields(&self.payload)
    }

    /// Convert into the application view.
    pub fn into_message(self) -> Message {
        Message {
            packet_type: char::from(self.packet_type),
            fields: split_fields(&self.payload),
        }
    }
}

/// A decoded packet: type character plus its payload fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The packet type character.
    pub packet_type: char,
    /// Payload fields in wire order.
    pub fields: Vec<String>,
}

impl Message {
    /// Create a new message.
    pub fn new<S: Into<String>>(packet_type: char, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            packet_type,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The known packet type, if the type character is one.
    pub fn kind(&self) -> Option<PacketType> {
        u8::try_from(self.packet_type)
            .ok()
            .and_then(PacketType::from_code)
    }

    /// Whether this message has the given type.
    pub fn is(&self, kind: PacketType) -> bool {
        self.packet_type == kind.as_char()
    }

    /// Field at `index`, if present.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// Join fields with the field delimiter.
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(DELIMITER);
        }
        out.extend_from_slice(field.as_ref().as_bytes());
    }
    out
}

/// Split a payload on the field delimiter.
///
/// Every empty field is kept, trailing ones included. An empty payload has
/// no fields. Bytes that are not valid UTF-8 are replaced with U+FFFD.
pub fn split_fields(payload: &[u8]) -> Vec<String> {
    if payload.is_empty() {
        return Vec::new();
    }
    payload
        .split(|byte| *byte == DELIMITER)
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

/// Encode a packet into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬───────────┬──────────────────────┬────────────┐
/// │ Length(1B) │ Type (1B) │ Payload (Length-2 B) │ 0x00 (1B)  │
/// └────────────┴───────────┴──────────────────────┴────────────┘
/// ```
///
/// Fails with [`FrameError::PacketTooLarge`] when type + payload + terminator
/// exceeds 255 bytes. Nothing is written to `dst` on failure.
pub fn encode_packet(packet_type: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let body_len = payload.len() + 2;
    if body_len > MAX_BODY_LEN {
        return Err(FrameError::PacketTooLarge {
            size: body_len,
            max: MAX_BODY_LEN,
        });
    }
    dst.reserve(1 + body_len);
    dst.put_u8(body_len as u8);
    dst.put_u8(packet_type);
    dst.put_slice(payload);
    dst.put_u8(TERMINATOR);
    Ok(())
}

/// Encode an already assembled body (type byte followed by payload).
///
/// Only the terminator and length byte are added.
pub fn encode_raw(body: &[u8], dst: &mut BytesMut) -> Result<()> {
    match body.split_first() {
        Some((packet_type, payload)) => encode_packet(*packet_type, payload, dst),
        None => Err(FrameError::EmptyPacket),
    }
}

/// Encode a packet type character and its fields.
pub fn encode_message<S: AsRef<str>>(
    packet_type: char,
    fields: &[S],
    dst: &mut BytesMut,
) -> Result<()> {
    let code = type_byte(packet_type)?;
    encode_packet(code, &join_fields(fields), dst)
}

/// Decode a packet body (the bytes after the length prefix).
///
/// The first byte is the type. One trailing terminator is stripped when
/// present; a body without one is taken as-is.
pub fn decode_packet(body: &[u8]) -> Result<Packet> {
    let (packet_type, rest) = body.split_first().ok_or(FrameError::EmptyPacket)?;
    let payload = match rest.split_last() {
        Some((&TERMINATOR, payload)) => payload,
        _ => rest,
    };
    Ok(Packet::new(*packet_type, Bytes::copy_from_slice(payload)))
}

/// Decode a packet body straight into its type character and fields.
pub fn decode_message(body: &[u8]) -> Result<Message> {
    decode_packet(body).map(Packet::into_message)
}

pub(crate) fn type_byte(packet_type: char) -> Result<u8> {
    if packet_type.is_ascii() {
        Ok(packet_type as u8)
    } else {
        Err(FrameError::InvalidPacketType(packet_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(packet_type: char, fields: &[&str]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_message(packet_type, fields, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn test_encode_layout() {
        let wire = encoded('b', &["hi"]);
        assert_eq!(wire, vec![4, b'b', b'h', b'i', 0x00]);
    }

    #[test]
    fn test_encode_joins_fields() {
        let wire = encoded('a', &["alice", "alice", "1", "login", ""]);
        assert_eq!(wire[0] as usize, wire.len() - 1);
        assert_eq!(&wire[1..], b"aalice\x01alice\x011\x01login\x01\x00");
    }

    #[test]
    fn test_encode_empty_payload() {
        let wire = encoded('m', &[]);
        assert_eq!(wire, vec![2, b'm', 0x00]);
    }

    #[test]
    fn test_decode_roundtrip() {
        let cases: Vec<(char, Vec<&str>)> = vec![
            ('b', vec!["hello there"]),
            ('c', vec!["bob", "psst"]),
            ('d', vec!["Arrive", "carol has entered the group"]),
            ('a', vec!["alice", "alice", "1", "login", "secret"]),
            ('l', vec![]),
            ('b', vec!["a", ""]),
            ('c', vec!["", "x"]),
        ];
        for (packet_type, fields) in cases {
            let wire = encoded(packet_type, &fields);
            let message = decode_message(&wire[1..]).unwrap();
            assert_eq!(message.packet_type, packet_type);
            assert_eq!(message.fields, fields);
        }
    }

    #[test]
    fn test_decode_preserves_empty_fields() {
        let message = decode_message(b"dfirst\x01\x01third\x01\x00").unwrap();
        assert_eq!(message.fields, vec!["first", "", "third", ""]);
    }

    #[test]
    fn test_decode_single_empty_field_is_no_fields() {
        let wire = encoded('b', &[""]);
        let message = decode_message(&wire[1..]).unwrap();
        assert!(message.fields.is_empty());
    }

    #[test]
    fn test_decode_without_terminator() {
        let packet = decode_packet(b"bplain").unwrap();
        assert_eq!(packet.packet_type, b'b');
        assert_eq!(packet.payload.as_ref(), b"plain");
    }

    #[test]
    fn test_decode_unknown_type_passes_through() {
        let message = decode_message(b"zsome\x01thing\x00").unwrap();
        assert_eq!(message.packet_type, 'z');
        assert_eq!(message.kind(), None);
        assert_eq!(message.fields, vec!["some", "thing"]);
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(matches!(decode_packet(b""), Err(FrameError::EmptyPacket)));
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let message = decode_message(b"b\xffok\x00").unwrap();
        assert_eq!(message.fields, vec!["\u{fffd}ok"]);
    }

    #[test]
    fn test_max_size_boundary() {
        let mut buf = BytesMut::new();
        let fits = vec![b'x'; MAX_PAYLOAD_LEN];
        encode_packet(b'b', &fits, &mut buf).unwrap();
        assert_eq!(buf.len(), 256);
        assert_eq!(buf[0], 255);

        let mut buf = BytesMut::new();
        let too_big = vec![b'x'; MAX_PAYLOAD_LEN + 1];
        let err = encode_packet(b'b', &too_big, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PacketTooLarge {
                size: 256,
                max: 255
            }
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_field_join_counts_toward_limit() {
        let half = "y".repeat(127);
        let mut buf = BytesMut::new();
        // 127 + 1 delimiter + 127 = 255 payload bytes.
        let err = encode_message('b', &[half.as_str(), half.as_str()], &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::PacketTooLarge { size: 257, .. }));
    }

    #[test]
    fn test_encode_raw() {
        let mut buf = BytesMut::new();
        encode_raw(b"hw\x01", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"\x04hw\x01\x00");

        let mut buf = BytesMut::new();
        assert!(matches!(
            encode_raw(b"", &mut buf),
            Err(FrameError::EmptyPacket)
        ));
    }

    #[test]
    fn test_non_ascii_type_rejected() {
        let mut buf = BytesMut::new();
        let err = encode_message('λ', &["x"], &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::InvalidPacketType('λ')));
    }

    #[test]
    fn test_packet_sizes() {
        let packet = Packet::new(b'b', Bytes::from_static(b"test"));
        assert_eq!(packet.body_len(), 6);
        assert_eq!(packet.wire_size(), 7);
        assert_eq!(packet.kind(), Some(PacketType::Open));
    }

    #[test]
    fn test_message_accessors() {
        let message = Message::new('c', ["bob", "hello"]);
        assert!(message.is(PacketType::Personal));
        assert_eq!(message.field(0), Some("bob"));
        assert_eq!(message.field(2), None);
    }
}
