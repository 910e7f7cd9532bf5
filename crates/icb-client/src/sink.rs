//! Optional diagnostic observer for a connection.
//!
//! A sink receives one human-readable line per packet sent or received. The
//! connection behaves identically with or without one attached.

use std::sync::Arc;

/// Something that can record a diagnostic line.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, line: &str);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn record(&self, line: &str) {
        self(line)
    }
}

/// Shared handle to a sink.
pub type SinkHandle = Arc<dyn DiagnosticSink>;

/// Forwards diagnostic lines to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, line: &str) {
        tracing::debug!(target: "icb::wire", "{line}");
    }
}

/// Render packet bytes for a log line: control bytes become `^A`-style
/// escapes, everything else is shown lossily as text.
pub fn printable(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in String::from_utf8_lossy(bytes).chars() {
        match chunk {
            '\0' => out.push_str("\\0"),
            c if (c as u32) < 0x20 => {
                out.push('^');
                out.push(char::from(b'@' + c as u8));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn printable_escapes_control_bytes() {
        assert_eq!(printable(b"aalice\x01alice\x00"), "aalice^Aalice\\0");
        assert_eq!(printable(b"plain"), "plain");
    }

    #[test]
    fn closures_are_sinks() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&lines);
        let sink: SinkHandle = Arc::new(move |line: &str| {
            captured.lock().unwrap().push(line.to_string());
        });

        sink.record("one");
        TracingSink.record("ignored without a subscriber");

        assert_eq!(*lines.lock().unwrap(), vec!["one".to_string()]);
    }
}
