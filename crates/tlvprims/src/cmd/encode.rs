use bytes::Bytes;
use tlvprims_wire::{Tag, TlvWriter};

use crate::cmd::{parse_tag, EncodeArgs, DEFLATE_CHUNK};
use crate::exit::{
    compress_error, crypto_error, io_error, tlv_error, CliError, CliResult, SUCCESS, USAGE,
};
use crate::output::{print_wire, OutputFormat};

pub fn run(args: EncodeArgs, format: Option<OutputFormat>) -> CliResult<i32> {
    let format = format.unwrap_or_else(OutputFormat::default_for_wire);

    let mut writer = TlvWriter::new();
    for field in &args.fields {
        let (tag, value) = parse_field(field)?;
        writer.write(tag, value);
    }

    let mut wire = writer
        .serialize()
        .map_err(|err| tlv_error("encode failed", err))?
        .to_vec();
    tracing::debug!(records = writer.len(), bytes = wire.len(), "serialized");

    if args.deflate {
        let compressed = tlvprims_compress::deflate(&wire, DEFLATE_CHUNK)
            .map_err(|err| compress_error("deflate failed", err))?;
        tracing::debug!(
            original = wire.len(),
            compressed = compressed.len(),
            "deflated buffer"
        );
        wire = compressed;
    }

    if let Some(secret) = &args.secret {
        wire = tlvprims_crypto::encrypt(&wire, secret)
            .map_err(|err| crypto_error("seal failed", err))?;
    }

    match &args.output {
        Some(path) => std::fs::write(path, &wire)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?,
        None => print_wire(&wire, format),
    }

    Ok(SUCCESS)
}

fn parse_field(input: &str) -> CliResult<(Tag, Bytes)> {
    let (tag_part, value_part) = input
        .split_once('=')
        .ok_or_else(|| CliError::new(USAGE, format!("field must be TAG=VALUE: {input}")))?;

    let tag = parse_tag(tag_part)?;

    let value = if let Some(hex_part) = value_part.strip_prefix("hex:") {
        Bytes::from(
            hex::decode(hex_part)
                .map_err(|err| CliError::new(USAGE, format!("invalid hex value: {err}")))?,
        )
    } else {
        Bytes::copy_from_slice(value_part.as_bytes())
    };

    if value.is_empty() {
        return Err(CliError::new(
            USAGE,
            format!("field {tag_part} has an empty value (length 0 is not encodable)"),
        ));
    }

    Ok((tag, value))
}
