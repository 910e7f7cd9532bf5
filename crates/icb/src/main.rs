mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, RunContext};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "icb", version, about = "ICB chat protocol client")]
struct Cli {
    /// Output format for received messages.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). `debug` also logs every packet.
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let ctx = RunContext {
        format: cli.format.unwrap_or_else(OutputFormat::default_for_stdout),
        wire_trace: cli.log_level.wants_wire_trace(),
    };

    match cmd::run(cli.command, &ctx) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_open() {
        let cli = Cli::try_parse_from([
            "icb", "send", "--host", "localhost", "--user", "alice", "--open", "hello",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.open.as_deref(), Some("hello"));
                assert_eq!(args.connect.host.as_deref(), Some("localhost"));
            }
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn parses_command_with_trailing_args() {
        let cli = Cli::try_parse_from(["icb", "send", "--command", "topic", "rust", "talk"])
            .expect("command args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.command.as_deref(), Some("topic"));
                assert_eq!(args.args, vec!["rust", "talk"]);
            }
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from(["icb", "send", "--open", "hi", "--command", "w"])
            .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn private_requires_message() {
        let err = Cli::try_parse_from(["icb", "send", "--private", "bob"])
            .expect_err("--private alone should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_login_command() {
        let cli = Cli::try_parse_from(["icb", "listen", "--cmd", "w", "--count", "3"])
            .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.connect.cmd, Some(icb_client::LoginCommand::W));
                assert_eq!(args.count, Some(3));
            }
            other => panic!("expected listen, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_login_command() {
        assert!(Cli::try_parse_from(["icb", "listen", "--cmd", "join"]).is_err());
    }
}
