use icb_client::{connect_with_sink, ClientError, Connection};
use icb_frame::{Message, PacketType};

use crate::cmd::{RunContext, SendArgs};
use crate::exit::{client_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::print_message;

/// What `send` puts on the wire once logged in.
#[derive(Debug, PartialEq, Eq)]
enum Outgoing {
    Open(String),
    Private { nick: String, message: String },
    Command { cmd: String, args: Vec<String> },
}

pub fn run(args: SendArgs, ctx: &RunContext) -> CliResult<i32> {
    let outgoing = resolve_outgoing(&args)?;
    let config = args.connect.to_config()?;
    let server = config.addr();

    let mut conn = connect_with_sink(config, ctx.sink())
        .map_err(|err| client_error("connect failed", err))?;

    if args.wait_login {
        wait_for_login(&mut conn, |message| {
            print_message(message, &server, ctx.format)
        })?;
    }

    let sent = match &outgoing {
        Outgoing::Open(text) => conn.send_open(text),
        Outgoing::Private { nick, message } => conn.send_private(nick, message),
        Outgoing::Command { cmd, args } => conn.send_command(cmd, args),
    };
    sent.map_err(|err| client_error("send failed", err))?;

    tracing::info!(server = %server, "message sent");
    conn.close();
    Ok(SUCCESS)
}

fn resolve_outgoing(args: &SendArgs) -> CliResult<Outgoing> {
    if let Some(text) = &args.open {
        return Ok(Outgoing::Open(text.clone()));
    }
    if let (Some(nick), Some(message)) = (&args.private, &args.message) {
        return Ok(Outgoing::Private {
            nick: nick.clone(),
            message: message.clone(),
        });
    }
    if let Some(cmd) = &args.command {
        return Ok(Outgoing::Command {
            cmd: cmd.clone(),
            args: args.args.clone(),
        });
    }
    Err(CliError::new(
        USAGE,
        "nothing to send: use --open, --private/--message or --command",
    ))
}

trait MessageSource {
    fn next_message(&mut self) -> Result<Message, ClientError>;
}

impl MessageSource for Connection {
    fn next_message(&mut self) -> Result<Message, ClientError> {
        self.read_message()
    }
}

/// Read until the login acknowledgment, handing every message to `seen`.
///
/// An error packet before the acknowledgment means the server refused the
/// login.
fn wait_for_login<R, F>(source: &mut R, mut seen: F) -> CliResult<()>
where
    R: MessageSource,
    F: FnMut(&Message),
{
    loop {
        let message = source
            .next_message()
            .map_err(|err| client_error("waiting for login failed", err))?;
        seen(&message);

        if message.is(PacketType::Login) {
            return Ok(());
        }
        if message.is(PacketType::Error) {
            return Err(CliError::new(
                FAILURE,
                format!(
                    "login rejected: {}",
                    message.field(0).unwrap_or("no reason given")
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use icb_frame::FrameError;

    use super::*;

    struct ScriptedSource {
        messages: VecDeque<Message>,
    }

    impl ScriptedSource {
        fn new(messages: Vec<Message>) -> Self {
            Self {
                messages: messages.into(),
            }
        }
    }

    impl MessageSource for ScriptedSource {
        fn next_message(&mut self) -> Result<Message, ClientError> {
            self.messages
                .pop_front()
                .ok_or(ClientError::Frame(FrameError::ConnectionClosed))
        }
    }

    #[test]
    fn wait_for_login_stops_at_ack() {
        let mut source = ScriptedSource::new(vec![
            Message::new('j', ["1", "localhost", "icbd"]),
            Message::new('a', Vec::<String>::new()),
            Message::new('b', ["bob", "not read"]),
        ]);
        let mut seen = Vec::new();

        wait_for_login(&mut source, |message| seen.push(message.packet_type))
            .expect("login should be acknowledged");

        assert_eq!(seen, vec!['j', 'a']);
        assert_eq!(source.messages.len(), 1);
    }

    #[test]
    fn wait_for_login_reports_rejection() {
        let mut source = ScriptedSource::new(vec![Message::new('e', ["Nickname already in use"])]);

        let err = wait_for_login(&mut source, |_| {}).expect_err("login should be rejected");
        assert_eq!(err.code, FAILURE);
        assert_eq!(err.message, "login rejected: Nickname already in use");
    }

    #[test]
    fn wait_for_login_surfaces_disconnect() {
        let mut source = ScriptedSource::new(Vec::new());
        let err = wait_for_login(&mut source, |_| {}).expect_err("closed stream should fail");
        assert_eq!(err.code, FAILURE);
    }

    #[test]
    fn outgoing_command_keeps_args() {
        let args = SendArgs {
            connect: Default::default(),
            open: None,
            private: None,
            message: None,
            command: Some("topic".to_string()),
            args: vec!["rust".to_string(), "talk".to_string()],
            wait_login: false,
        };
        assert_eq!(
            resolve_outgoing(&args).expect("command should resolve"),
            Outgoing::Command {
                cmd: "topic".to_string(),
                args: vec!["rust".to_string(), "talk".to_string()],
            }
        );
    }

    #[test]
    fn nothing_to_send_is_usage() {
        let args = SendArgs {
            connect: Default::default(),
            open: None,
            private: None,
            message: None,
            command: None,
            args: Vec::new(),
            wait_login: false,
        };
        assert_eq!(resolve_outgoing(&args).unwrap_err().code, USAGE);
    }
}
