use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use icb_client::{connect_with_sink, Closer};
use icb_frame::PacketType;

use crate::cmd::{ListenArgs, RunContext};
use crate::exit::{client_error, CliError, CliResult, SUCCESS};
use crate::output::print_message;

pub fn run(args: ListenArgs, ctx: &RunContext) -> CliResult<i32> {
    let config = args.connect.to_config()?;
    let server = config.addr();

    let mut conn = connect_with_sink(config, ctx.sink())
        .map_err(|err| client_error("connect failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    let closer = conn
        .closer()
        .map_err(|err| client_error("connect failed", err))?;
    install_ctrlc_handler(running.clone(), closer)?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let message = match conn.read_message() {
            Ok(message) => message,
            Err(err) if !running.load(Ordering::SeqCst) => {
                tracing::debug!(error = %err, "read interrupted by shutdown");
                break;
            }
            Err(err) if err.is_disconnect() => {
                tracing::info!(server = %server, "server closed the connection");
                break;
            }
            Err(err) => return Err(client_error("receive failed", err)),
        };

        let is_exit = message.is(PacketType::Exit);
        if !(args.skip_pings && message.is(PacketType::Ping)) {
            print_message(&message, &server, ctx.format);
            printed = printed.saturating_add(1);
        }

        if is_exit {
            tracing::info!(server = %server, "server sent exit");
            break;
        }
        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    conn.close();
    Ok(SUCCESS)
}

/// Ctrl-C stops the loop and closes the socket so a blocked read returns.
fn install_ctrlc_handler(running: Arc<AtomicBool>, closer: Closer) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
        if let Err(err) = closer.close() {
            tracing::warn!(error = %err, "failed closing connection on interrupt");
        }
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
