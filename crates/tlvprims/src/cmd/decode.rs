use std::collections::BTreeSet;

use bytes::BytesMut;
use tlvprims_wire::{decode_record, Record, TlvReader, DEFAULT_MAX_VALUE, RECORD_MIN_SIZE};

use crate::cmd::{load_buffer, parse_tag, DecodeArgs};
use crate::exit::{tlv_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS};
use crate::output::{print_raw, print_records, value_preview, OutputFormat};

pub fn run(args: DecodeArgs, format: Option<OutputFormat>) -> CliResult<i32> {
    let format = format.unwrap_or_else(OutputFormat::default_for_stdout);
    let data = load_buffer(&args.input)?;

    match &args.tag {
        Some(tag_text) => {
            let tag = parse_tag(tag_text)?;
            let mut reader = TlvReader::new();
            reader.read(&data);

            match reader.parse(tag).map_err(|err| tlv_error("decode failed", err))? {
                Some(value) => {
                    match format {
                        OutputFormat::Raw => print_raw(value.as_ref()),
                        _ => println!("{}", value_preview(value.as_ref())),
                    }
                    Ok(SUCCESS)
                }
                None => Err(CliError::new(
                    FAILURE,
                    format!("tag {} not found", tag.value()),
                )),
            }
        }
        None => {
            if data.len() < RECORD_MIN_SIZE {
                return Err(CliError::new(
                    DATA_INVALID,
                    "buffer shorter than the minimum record size",
                ));
            }

            let mut scan = BytesMut::from(&data[..]);
            let mut seen = BTreeSet::new();
            let mut records: Vec<Record> = Vec::new();
            loop {
                match decode_record(&mut scan, DEFAULT_MAX_VALUE) {
                    Ok(Some(record)) => {
                        // First occurrence wins, as in a bulk parse.
                        if seen.insert(record.tag.value()) {
                            records.push(record);
                        }
                    }
                    Ok(None) => break,
                    Err(err) => return Err(tlv_error("decode failed", err)),
                }
            }

            if !scan.is_empty() {
                tracing::debug!(remaining = scan.len(), "trailing bytes not parseable");
            }

            print_records(&records, format);
            Ok(SUCCESS)
        }
    }
}
