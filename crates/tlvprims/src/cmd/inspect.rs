use bytes::BytesMut;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tlvprims_wire::{decode_record, DEFAULT_MAX_VALUE};

use crate::cmd::{load_buffer, InspectArgs};
use crate::exit::{tlv_error, CliResult, SUCCESS};
use crate::output::{value_preview, OutputFormat};

const HEX_PREVIEW_BYTES: usize = 16;

#[derive(Serialize)]
struct InspectRow {
    offset: usize,
    tag: u32,
    tag_width: usize,
    length: usize,
    header_bytes: usize,
    value: String,
    hex: String,
}

#[derive(Serialize)]
struct InspectOutput {
    total_bytes: usize,
    records: Vec<InspectRow>,
    trailing_bytes: usize,
}

pub fn run(args: InspectArgs, format: Option<OutputFormat>) -> CliResult<i32> {
    let format = format.unwrap_or_else(OutputFormat::default_for_stdout);
    let data = load_buffer(&args.input)?;

    let mut scan = BytesMut::from(&data[..]);
    let mut rows = Vec::new();
    loop {
        let offset = data.len() - scan.len();
        let before = scan.len();
        match decode_record(&mut scan, DEFAULT_MAX_VALUE) {
            Ok(Some(record)) => {
                let consumed = before - scan.len();
                let hex_len = record.value.len().min(HEX_PREVIEW_BYTES);
                rows.push(InspectRow {
                    offset,
                    tag: record.tag.value(),
                    tag_width: record.tag.width().bytes(),
                    length: record.value.len(),
                    header_bytes: consumed - record.value.len(),
                    value: value_preview(record.value.as_ref()),
                    hex: hex::encode(&record.value[..hex_len]),
                });
            }
            Ok(None) => break,
            Err(err) => return Err(tlv_error("inspect failed", err)),
        }
    }

    let out = InspectOutput {
        total_bytes: data.len(),
        trailing_bytes: scan.len(),
        records: rows,
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "TAG", "WIDTH", "LENGTH", "HEADER", "VALUE"]);
            for row in &out.records {
                table.add_row(vec![
                    row.offset.to_string(),
                    row.tag.to_string(),
                    row.tag_width.to_string(),
                    row.length.to_string(),
                    row.header_bytes.to_string(),
                    row.value.clone(),
                ]);
            }
            println!("{table}");
            if out.trailing_bytes > 0 {
                println!(
                    "{} trailing bytes not parseable (incomplete record)",
                    out.trailing_bytes
                );
            }
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &out.records {
                println!(
                    "offset={} tag={} width={} length={} header={} hex={}",
                    row.offset, row.tag, row.tag_width, row.length, row.header_bytes, row.hex
                );
            }
            if out.trailing_bytes > 0 {
                println!("trailing={}", out.trailing_bytes);
            }
        }
    }

    Ok(SUCCESS)
}
