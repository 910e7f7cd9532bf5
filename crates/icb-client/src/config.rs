use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ClientError, Result};

/// Default server host.
pub const DEFAULT_HOST: &str = "default.icb.net";
/// Default server port.
pub const DEFAULT_PORT: u16 = 7326;
/// Default group joined at login.
pub const DEFAULT_GROUP: &str = "1";

/// Login mode sent as the fourth login field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginCommand {
    /// Join the group and chat.
    #[default]
    Login,
    /// List who is on, then disconnect.
    W,
}

impl LoginCommand {
    /// Wire form of the command.
    pub const fn as_str(self) -> &'static str {
        match self {
            LoginCommand::Login => "login",
            LoginCommand::W => "w",
        }
    }
}

impl fmt::Display for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginCommand {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "login" => Ok(LoginCommand::Login),
            "w" => Ok(LoginCommand::W),
            other => Err(ClientError::InvalidConfig(format!(
                "unknown login command {other:?} (expected \"login\" or \"w\")"
            ))),
        }
    }
}

/// Connection settings, fixed once handed to [`crate::connect`].
///
/// Every recognized option is a field; deserializing a document with any
/// other key fails.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Login identity.
    pub user: String,
    /// Display nickname. Falls back to `user`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    /// Initial group, in its string form.
    #[serde(deserialize_with = "group_from_name_or_id")]
    pub group: String,
    /// Login mode.
    pub cmd: LoginCommand,
    /// Optional password. Sent in cleartext and redacted in debug output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passwd: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: std::env::var("USER").unwrap_or_default(),
            nick: None,
            group: DEFAULT_GROUP.to_string(),
            cmd: LoginCommand::default(),
            passwd: None,
        }
    }
}

impl ConnectionConfig {
    /// Defaults for everything except the login identity.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Some(nick.into());
        self
    }

    /// Set the group from anything with a string form (`1`, `"rust"`).
    pub fn with_group(mut self, group: impl fmt::Display) -> Self {
        self.group = group.to_string();
        self
    }

    pub fn with_cmd(mut self, cmd: LoginCommand) -> Self {
        self.cmd = cmd;
        self
    }

    pub fn with_passwd(mut self, passwd: impl Into<String>) -> Self {
        self.passwd = Some(passwd.into());
        self
    }

    /// Effective nickname.
    pub fn nick(&self) -> &str {
        self.nick.as_deref().unwrap_or(&self.user)
    }

    /// Effective password (empty when unset).
    pub fn passwd(&self) -> &str {
        self.passwd.as_deref().unwrap_or_default()
    }

    /// `host:port` for diagnostics.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that the config can be sent as a login packet.
    ///
    /// Login fields must be free of the field delimiter and the terminator,
    /// and the host and user must be set.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ClientError::InvalidConfig("host must not be empty".into()));
        }
        if self.user.is_empty() {
            return Err(ClientError::InvalidConfig("user must not be empty".into()));
        }

        let fields = [
            ("user", self.user.as_str()),
            ("nick", self.nick()),
            ("group", self.group.as_str()),
            ("passwd", self.passwd()),
        ];
        for (name, value) in fields {
            if value
                .bytes()
                .any(|b| b == icb_frame::DELIMITER || b == icb_frame::TERMINATOR)
            {
                return Err(ClientError::InvalidConfig(format!(
                    "{name} contains a reserved control byte"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("ConnectionConfig");
        dbg.field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("nick", &self.nick)
            .field("group", &self.group)
            .field("cmd", &self.cmd);
        if let Some(passwd) = &self.passwd {
            dbg.field("passwd", &format_args!("<redacted:{} bytes>", passwd.len()));
        } else {
            dbg.field("passwd", &Option::<String>::None);
        }
        dbg.finish()
    }
}

fn group_from_name_or_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Group {
        Id(u64),
        Name(String),
    }

    Ok(match Group::deserialize(deserializer)? {
        Group::Id(id) => id.to_string(),
        Group::Name(name) => name,
    })
}
