use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tlvprims_wire::Record;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    /// Default for record listings: a table on a terminal, JSON in a pipe.
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }

    /// Default for wire output: a hex summary on a terminal, raw bytes in
    /// a pipe.
    pub fn default_for_wire() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Raw
        }
    }
}

#[derive(Serialize)]
struct RecordOutput {
    tag: u32,
    width: usize,
    size: usize,
    value: String,
    hex: String,
}

impl RecordOutput {
    fn from_record(record: &Record) -> Self {
        Self {
            tag: record.tag.value(),
            width: record.tag.width().bytes(),
            size: record.value.len(),
            value: value_preview(record.value.as_ref()),
            hex: hex::encode(record.value.as_ref()),
        }
    }
}

pub fn print_records(records: &[Record], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<RecordOutput> = records.iter().map(RecordOutput::from_record).collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TAG", "WIDTH", "SIZE", "VALUE"]);
            for record in records {
                table.add_row(vec![
                    record.tag.value().to_string(),
                    record.tag.width().bytes().to_string(),
                    record.value.len().to_string(),
                    value_preview(record.value.as_ref()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for record in records {
                println!(
                    "tag={} width={} size={} value={}",
                    record.tag.value(),
                    record.tag.width().bytes(),
                    record.value.len(),
                    value_preview(record.value.as_ref())
                );
            }
        }
        OutputFormat::Raw => {
            for record in records {
                print_raw(record.value.as_ref());
            }
        }
    }
}

/// Print an encoded wire buffer.
pub fn print_wire(wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Raw => print_raw(wire),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct WireOutput {
                size: usize,
                hex: String,
            }
            let out = WireOutput {
                size: wire.len(),
                hex: hex::encode(wire),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{} bytes: {}", wire.len(), hex::encode(wire));
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn value_preview(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ => format!("<binary {} bytes>", value.len()),
    }
}
