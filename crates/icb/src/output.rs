use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use icb_frame::{type_name, Message};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    packet_type: String,
    type_name: &'a str,
    fields: &'a [String],
    server: &'a str,
    timestamp: String,
}

pub fn print_message(message: &Message, server: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", message_json(message, server));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "SERVER", "FIELDS"])
                .add_row(vec![
                    type_name(message.packet_type).to_string(),
                    server.to_string(),
                    message.fields.join(" | "),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", pretty_line(message));
        }
        OutputFormat::Raw => {
            let mut line = message.fields.join("\t");
            line.push('\n');
            let mut out = std::io::stdout();
            let _ = out.write_all(line.as_bytes());
            let _ = out.flush();
        }
    }
}

fn message_json(message: &Message, server: &str) -> String {
    let out = MessageOutput {
        packet_type: message.packet_type.to_string(),
        type_name: type_name(message.packet_type),
        fields: &message.fields,
        server,
        timestamp: now_unix_seconds(),
    };
    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
}

/// One line per message in the usual chat-client shape.
pub fn pretty_line(message: &Message) -> String {
    let field = |idx: usize| message.field(idx).unwrap_or_default();
    match message.packet_type {
        'b' | 'n' => format!("<{}> {}", field(0), field(1)),
        'c' | 'o' => format!("*{}* {}", field(0), field(1)),
        'd' => format!("[={}=] {}", field(0), field(1)),
        'e' => format!("[=Error=] {}", field(0)),
        'f' => format!("[=Alert=] {}", field(0)),
        'k' => format!("[=Beep=] {} beeps you", field(0)),
        other => format!("[{}] {}", type_name(other), message.fields.join(" ")),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
