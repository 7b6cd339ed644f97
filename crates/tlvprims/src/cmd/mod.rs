use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use tlvprims_wire::Tag;

use crate::exit::{compress_error, crypto_error, io_error, tlv_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod version;

/// Work-buffer size handed to the deflate/inflate streaming loops.
pub const DEFLATE_CHUNK: usize = 4096;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode fields into a TLV buffer.
    Encode(EncodeArgs),
    /// Decode a TLV buffer and print its records.
    Decode(DecodeArgs),
    /// Show the wire-level layout of a TLV buffer.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: Option<OutputFormat>) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Field to encode, as TAG=VALUE. Repeatable; a repeated tag
    /// overwrites the earlier value. TAG is decimal or 0x-prefixed hex;
    /// VALUE is UTF-8, or hex with a `hex:` prefix.
    #[arg(long = "field", value_name = "TAG=VALUE", required = true)]
    pub fields: Vec<String>,
    /// Compress the serialized buffer.
    #[arg(long)]
    pub deflate: bool,
    /// Seal the serialized buffer with this secret.
    #[arg(long, value_name = "SECRET", env = "TLVPRIMS_SECRET")]
    pub secret: Option<String>,
    /// Write output to a file instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Extract only this tag's value.
    #[arg(long, short = 't', value_name = "TAG")]
    pub tag: Option<String>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Input source and unwrapping steps shared by `decode` and `inspect`.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Read the buffer from a file instead of stdin.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
    /// Treat input as hex text rather than raw bytes.
    #[arg(long)]
    pub hex: bool,
    /// Open a sealed buffer with this secret before decoding.
    #[arg(long, value_name = "SECRET", env = "TLVPRIMS_SECRET")]
    pub secret: Option<String>,
    /// Decompress the buffer before decoding.
    #[arg(long)]
    pub inflate: bool,
}

/// Read the input buffer and undo sealing/compression, innermost last.
pub fn load_buffer(args: &InputArgs) -> CliResult<Vec<u8>> {
    let mut data = match &args.file {
        Some(path) => std::fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            buf
        }
    };

    if args.hex {
        let text: String = String::from_utf8_lossy(&data)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        data = hex::decode(&text)
            .map_err(|err| CliError::new(USAGE, format!("input is not valid hex: {err}")))?;
    }

    if let Some(secret) = &args.secret {
        data = tlvprims_crypto::decrypt(&data, secret)
            .map_err(|err| crypto_error("open failed", err))?;
    }

    if args.inflate {
        data = tlvprims_compress::inflate(&data, DEFLATE_CHUNK)
            .map_err(|err| compress_error("inflate failed", err))?;
    }

    Ok(data)
}

/// Parse a tag from the command line: decimal or 0x-prefixed hex.
pub fn parse_tag(input: &str) -> CliResult<Tag> {
    let value = if let Some(hex_part) = input.strip_prefix("0x") {
        u32::from_str_radix(hex_part, 16)
    } else {
        input.parse()
    }
    .map_err(|_| CliError::new(USAGE, format!("invalid tag: {input}")))?;

    Tag::new(value).map_err(|err| tlv_error("invalid tag", err))
}
