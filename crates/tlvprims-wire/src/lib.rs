//! Escape-byte TLV record codec.
//!
//! This is the core value-add layer of tlvprims. Every record is laid out
//! as tag, length, value with no terminator, header or checksum:
//! - Tags and lengths use a variable-width big-endian encoding: one byte,
//!   or an escape byte `0x00` plus two bytes, or two escapes plus four
//! - Length always equals the exact number of value bytes that follow
//! - A partially buffered trailing record is clean end-of-stream, not
//!   corruption
//!
//! Zero is unrepresentable under the escape scheme: tag 0 and zero-length
//! values are rejected at the encode boundary.

pub mod codec;
pub mod convert;
pub mod error;
pub mod reader;
pub mod varint;
pub mod writer;

pub use codec::{
    decode_record, encode_record, DecodeConfig, Record, Tag, TagWidth, DEFAULT_MAX_VALUE,
    RECORD_MIN_SIZE,
};
pub use convert::{BigEndian, Converter};
pub use error::{Result, TlvError};
pub use reader::TlvReader;
pub use varint::{decode_varint, encode_varint, varint_size, SENTINEL, VARINT_MAX_SIZE};
pub use writer::TlvWriter;
