use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use icb_client::{ConnectionConfig, LoginCommand, SinkHandle, TracingSink};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and send a single message or command.
    Send(SendArgs),
    /// Log in and print incoming messages.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Options shared by the commands that run a session.
pub struct RunContext {
    pub format: OutputFormat,
    pub wire_trace: bool,
}

impl RunContext {
    /// Sink for per-packet wire lines, when debug logging is on.
    pub fn sink(&self) -> Option<SinkHandle> {
        self.wire_trace.then(|| Arc::new(TracingSink) as SinkHandle)
    }
}

pub fn run(command: Command, ctx: &RunContext) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, ctx),
        Command::Listen(args) => listen::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct ConnectArgs {
    /// JSON file with connection settings. Flags override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Server host.
    #[arg(long, env = "ICB_HOST")]
    pub host: Option<String>,
    /// Server port.
    #[arg(long, env = "ICB_PORT")]
    pub port: Option<u16>,
    /// Login identity. Defaults to $USER.
    #[arg(long, short = 'u')]
    pub user: Option<String>,
    /// Nickname. Defaults to the login identity.
    #[arg(long, short = 'n')]
    pub nick: Option<String>,
    /// Group to join at login.
    #[arg(long, short = 'g')]
    pub group: Option<String>,
    /// Login mode: "login" joins the group, "w" lists users.
    #[arg(long)]
    pub cmd: Option<LoginCommand>,
    /// Login password.
    #[arg(long, env = "ICB_PASSWD", hide_env_values = true)]
    pub passwd: Option<String>,
}

impl ConnectArgs {
    /// Build the session config: file values first, then flag overrides.
    pub fn to_config(&self) -> CliResult<ConnectionConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ConnectionConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(nick) = &self.nick {
            config.nick = Some(nick.clone());
        }
        if let Some(group) = &self.group {
            config.group = group.clone();
        }
        if let Some(cmd) = self.cmd {
            config.cmd = cmd;
        }
        if let Some(passwd) = &self.passwd {
            config.passwd = Some(passwd.clone());
        }

        config
            .validate()
            .map_err(|err| crate::exit::client_error("invalid connection settings", err))?;
        Ok(config)
    }
}

fn load_config(path: &std::path::Path) -> CliResult<ConnectionConfig> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        crate::exit::io_error(&format!("failed reading {}", path.display()), &err)
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        CliError::new(
            USAGE,
            format!("invalid config file {}: {err}", path.display()),
        )
    })
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
    /// Open message to the group.
    #[arg(long, conflicts_with_all = ["private", "command"])]
    pub open: Option<String>,
    /// Nickname to send a private message to (with --message).
    #[arg(
        long,
        value_name = "NICK",
        requires = "message",
        conflicts_with_all = ["open", "command"]
    )]
    pub private: Option<String>,
    /// Private message text.
    #[arg(long, requires = "private")]
    pub message: Option<String>,
    /// Server command to run (e.g. "w", "g", "topic").
    #[arg(long, conflicts_with_all = ["open", "private"])]
    pub command: Option<String>,
    /// Arguments for --command.
    #[arg(requires = "command", trailing_var_arg = true)]
    pub args: Vec<String>,
    /// Wait for the server's login acknowledgment before sending.
    #[arg(long)]
    pub wait_login: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Do not print keepalive pings (they are still answered).
    #[arg(long)]
    pub skip_pings: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
