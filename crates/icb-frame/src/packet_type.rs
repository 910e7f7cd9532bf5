//! ICB packet type codes.
//!
//! Each packet carries one ASCII letter identifying its kind. Login and the
//! server's login acknowledgment share the code `a`.

/// Known ICB packet types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    /// Login request (client) or login acknowledgment (server).
    Login,
    /// Open message to the current group.
    Open,
    /// Personal message.
    Personal,
    /// Group status update.
    Status,
    /// Error message.
    Error,
    /// Important announcement.
    Alert,
    /// Quit packet from the server.
    Exit,
    /// Command sent by the user.
    Command,
    /// Output from a command.
    CommandOutput,
    /// Protocol/version information.
    Protocol,
    /// Beep.
    Beep,
    /// Keepalive ping from the server.
    Ping,
    /// Reply to a ping.
    Pong,
    /// Echo of own open message.
    OwnOpen,
    /// Echo of own personal message.
    OwnPersonal,
}

impl PacketType {
    /// Every known packet type, in code order.
    pub const ALL: [PacketType; 15] = [
        PacketType::Login,
        PacketType::Open,
        PacketType::Personal,
        PacketType::Status,
        PacketType::Error,
        PacketType::Alert,
        PacketType::Exit,
        PacketType::Command,
        PacketType::CommandOutput,
        PacketType::Protocol,
        PacketType::Beep,
        PacketType::Ping,
        PacketType::Pong,
        PacketType::OwnOpen,
        PacketType::OwnPersonal,
    ];

    /// The wire byte for this packet type.
    pub const fn code(self) -> u8 {
        match self {
            PacketType::Login => b'a',
            PacketType::Open => b'b',
            PacketType::Personal => b'c',
            PacketType::Status => b'd',
            PacketType::Error => b'e',
            PacketType::Alert => b'f',
            PacketType::Exit => b'g',
            PacketType::Command => b'h',
            PacketType::CommandOutput => b'i',
            PacketType::Protocol => b'j',
            PacketType::Beep => b'k',
            PacketType::Ping => b'l',
            PacketType::Pong => b'm',
            PacketType::OwnOpen => b'n',
            PacketType::OwnPersonal => b'o',
        }
    }

    /// The wire code as a character.
    pub const fn as_char(self) -> char {
        self.code() as char
    }

    /// Look up a packet type by its wire byte.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            PacketType::Login => "LOGIN",
            PacketType::Open => "OPEN",
            PacketType::Personal => "PERSONAL",
            PacketType::Status => "STATUS",
            PacketType::Error => "ERROR",
            PacketType::Alert => "ALERT",
            PacketType::Exit => "EXIT",
            PacketType::Command => "COMMAND",
            PacketType::CommandOutput => "CMDOUT",
            PacketType::Protocol => "PROTO",
            PacketType::Beep => "BEEP",
            PacketType::Ping => "PING",
            PacketType::Pong => "PONG",
            PacketType::OwnOpen => "OOPEN",
            PacketType::OwnPersonal => "OPERSONAL",
        }
    }
}

/// Human-readable name for any packet type character.
pub fn type_name(code: char) -> &'static str {
    u8::try_from(code)
        .ok()
        .and_then(PacketType::from_code)
        .map_or("UNKNOWN", PacketType::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_consecutive_letters() {
        for (idx, kind) in PacketType::ALL.iter().enumerate() {
            assert_eq!(kind.code(), b'a' + idx as u8);
            assert_eq!(PacketType::from_code(kind.code()), Some(*kind));
        }
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(PacketType::from_code(b'p'), None);
        assert_eq!(PacketType::from_code(0), None);
        assert_eq!(type_name('z'), "UNKNOWN");
        assert_eq!(type_name('é'), "UNKNOWN");
    }

    #[test]
    fn names() {
        assert_eq!(type_name('l'), "PING");
        assert_eq!(PacketType::CommandOutput.name(), "CMDOUT");
        assert_eq!(PacketType::Pong.as_char(), 'm');
    }
}
