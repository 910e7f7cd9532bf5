use icb_frame::join_fields;

use crate::config::ConnectionConfig;

/// Login packet fields in wire order: user, nick, group, cmd, passwd.
///
/// `nick` falls back to `user` and a missing password is sent as an empty
/// field, so there are always five fields.
pub fn login_fields(config: &ConnectionConfig) -> [&str; 5] {
    [
        config.user.as_str(),
        config.nick(),
        config.group.as_str(),
        config.cmd.as_str(),
        config.passwd(),
    ]
}

/// Login packet payload (fields joined with the delimiter).
pub fn login_payload(config: &ConnectionConfig) -> Vec<u8> {
    join_fields(&login_fields(config))
}
