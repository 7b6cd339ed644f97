use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::convert::{BigEndian, Converter};
use crate::error::{Result, TlvError};
use crate::varint::{decode_varint, encode_varint, varint_size, SENTINEL, VARINT_MAX_SIZE};

/// Smallest complete record: 1 tag byte + 1 length byte + 1 value byte.
pub const RECORD_MIN_SIZE: usize = 3;

/// Largest value length the 4-byte length field can carry.
pub const DEFAULT_MAX_VALUE: usize = u32::MAX as usize;

/// Wire width of a tag, chosen by the caller and retained across decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagWidth {
    One,
    Two,
    Four,
}

impl TagWidth {
    /// Number of data bytes (before escape bytes are added).
    pub fn bytes(self) -> usize {
        match self {
            TagWidth::One => 1,
            TagWidth::Two => 2,
            TagWidth::Four => 4,
        }
    }

    fn minimal_for(value: u32) -> Self {
        if value <= u8::MAX as u32 {
            TagWidth::One
        } else if value <= u16::MAX as u32 {
            TagWidth::Two
        } else {
            TagWidth::Four
        }
    }
}

/// A record identifier: a non-zero integer plus its explicit wire width.
///
/// Tags 1-255 fit one byte, 256-65535 two bytes, larger values four bytes.
/// A wider-than-minimal width is legal (the extra escape bytes round-trip),
/// but tag 0 is reserved — it collides with the escape sentinel — and a
/// 2-byte tag with a zero high byte is rejected because its wire form is
/// indistinguishable from a deeper escape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    value: u32,
    width: TagWidth,
}

impl Tag {
    /// Create a tag with the narrowest width that fits `value`.
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(TlvError::InvalidInput(
                "tag 0 is reserved (collides with the escape sentinel)",
            ));
        }
        Ok(Self {
            value,
            width: TagWidth::minimal_for(value),
        })
    }

    /// Create a tag from its explicit big-endian byte representation.
    ///
    /// `bytes` must be exactly 1, 2 or 4 bytes; the given width is kept
    /// even when the numeric value would fit a narrower one.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let width = match bytes.len() {
            1 => TagWidth::One,
            2 => TagWidth::Two,
            4 => TagWidth::Four,
            width => return Err(TlvError::InvalidTagWidth { width }),
        };
        let value = BigEndian.to_int(bytes)?;
        if value == 0 {
            return Err(TlvError::InvalidInput(
                "tag 0 is reserved (collides with the escape sentinel)",
            ));
        }
        if width == TagWidth::Two && bytes[0] == SENTINEL {
            return Err(TlvError::InvalidInput(
                "2-byte tag must not begin with the escape sentinel",
            ));
        }
        Ok(Self { value, width })
    }

    /// The decoded numeric value, widened to `u32` regardless of width.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// The explicit wire width.
    pub fn width(&self) -> TagWidth {
        self.width
    }

    /// Total wire bytes this tag occupies, escape bytes included.
    pub fn wire_size(&self) -> usize {
        match self.width {
            TagWidth::One => 1,
            TagWidth::Two => 3,
            TagWidth::Four => 6,
        }
    }

    fn encode(&self, dst: &mut BytesMut) {
        match self.width {
            TagWidth::One => dst.put_u8(self.value as u8),
            TagWidth::Two => {
                dst.put_u8(SENTINEL);
                dst.put_u16(self.value as u16);
            }
            TagWidth::Four => {
                dst.put_u8(SENTINEL);
                dst.put_u8(SENTINEL);
                dst.put_u32(self.value);
            }
        }
    }

    /// Reconstruct a tag from a decoded field and its consumed byte count.
    fn from_wire(value: u32, consumed: usize) -> Self {
        let width = match consumed {
            1 => TagWidth::One,
            3 => TagWidth::Two,
            _ => TagWidth::Four,
        };
        Self { value, width }
    }
}

/// One decoded record: a tag and its value bytes.
#[derive(Debug, Clone)]
pub struct Record {
    pub tag: Tag,
    pub value: Bytes,
}

impl Record {
    pub fn new(tag: Tag, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// The total wire size of this record (tag + length + value).
    pub fn wire_size(&self) -> usize {
        self.tag.wire_size() + varint_size(self.value.len() as u32) + self.value.len()
    }
}

/// Limits applied while decoding.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Maximum value length accepted from a length field.
    /// Default: everything the wire format can express.
    pub max_value_size: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_value_size: DEFAULT_MAX_VALUE,
        }
    }
}

/// Encode one record into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬─────────────────────┬─────────────────┐
/// │ VarWidth(tag)    │ VarWidth(len)       │ Value            │
/// │ 1, 3 or 6 bytes  │ 1, 3 or 6 bytes     │ len bytes        │
/// └──────────────────┴─────────────────────┴─────────────────┘
/// ```
///
/// The tag keeps its caller-chosen width; the length field is always
/// minimal. Empty values are rejected: length 0 has no representation
/// under the escape scheme.
pub fn encode_record(tag: Tag, value: &[u8], dst: &mut BytesMut) -> Result<()> {
    if value.is_empty() {
        return Err(TlvError::InvalidInput(
            "empty value: length 0 collides with the escape sentinel",
        ));
    }
    if value.len() > DEFAULT_MAX_VALUE {
        return Err(TlvError::ValueTooLarge {
            size: value.len(),
            max: DEFAULT_MAX_VALUE,
        });
    }
    dst.reserve(tag.wire_size() + VARINT_MAX_SIZE + value.len());
    tag.encode(dst);
    encode_varint(value.len() as u32, dst)?;
    dst.put_slice(value);
    Ok(())
}

/// Decode one record from the front of a buffer.
///
/// Returns `Ok(None)` when fewer than [`RECORD_MIN_SIZE`] bytes remain or
/// when the value bytes of the record at the head are not fully buffered
/// yet — a partially received trailing record is expected when data
/// arrives incrementally, not corruption. On success, consumes the record
/// bytes from the buffer.
///
/// A tag or length field whose escape run cannot be resolved within the
/// remaining input is a [`TlvError::CorruptedStream`].
pub fn decode_record(src: &mut BytesMut, max_value: usize) -> Result<Option<Record>> {
    if src.len() < RECORD_MIN_SIZE {
        return Ok(None); // Need more data
    }

    let (tag_value, tag_consumed) = decode_varint(&src[..])?;
    let (length, length_consumed) = decode_varint(&src[tag_consumed..])?;
    let length = length as usize;

    if length > max_value {
        return Err(TlvError::ValueTooLarge {
            size: length,
            max: max_value,
        });
    }

    let header = tag_consumed + length_consumed;
    if src.len() - header < length {
        return Ok(None); // Need more data
    }

    src.advance(header);
    let value = src.split_to(length).freeze();

    Ok(Some(Record {
        tag: Tag::from_wire(tag_value, tag_consumed),
        value,
    }))
}
