use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl LogLevel {
    /// Whether per-packet `SEND:`/`RECV:` lines should be recorded.
    pub fn wants_wire_trace(self) -> bool {
        LevelFilter::from(self) >= LevelFilter::DEBUG
    }
}

/// Install the stderr subscriber. Stdout stays reserved for messages.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::from(level))
        .with_ansi(false)
        // Wire lines carry the `icb::wire` target; show targets once they are on.
        .with_target(level.wants_wire_trace());

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_trace_only_at_debug_and_below() {
        assert!(!LogLevel::Info.wants_wire_trace());
        assert!(!LogLevel::Error.wants_wire_trace());
        assert!(LogLevel::Debug.wants_wire_trace());
        assert!(LogLevel::Trace.wants_wire_trace());
    }
}
