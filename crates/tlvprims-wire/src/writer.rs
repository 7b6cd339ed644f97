use bytes::{Bytes, BytesMut};

use crate::codec::{encode_record, Tag};
use crate::convert::{BigEndian, Converter};
use crate::error::Result;

/// Buffers pending writes and serializes them in one pass.
///
/// Pending values are keyed by the tag's decoded numeric value — writing
/// the same numeric tag twice overwrites the earlier value and width,
/// keeping the original position. `serialize` emits records in insertion
/// order; that order is part of the contract.
///
/// A writer is scratch state for one encode session: it is not meant to be
/// shared, and is discarded after `serialize`.
pub struct TlvWriter {
    entries: Vec<(Tag, Bytes)>,
    converter: Box<dyn Converter>,
}

impl TlvWriter {
    /// Create a writer using the default big-endian converter.
    pub fn new() -> Self {
        Self::with_converter(Box::new(BigEndian))
    }

    /// Create a writer with a custom integer/byte converter for the
    /// numeric convenience methods.
    pub fn with_converter(converter: Box<dyn Converter>) -> Self {
        Self {
            entries: Vec::new(),
            converter,
        }
    }

    /// Buffer a value for `tag`, overwriting any pending value with the
    /// same numeric tag.
    pub fn write(&mut self, tag: Tag, value: impl Into<Bytes>) -> &mut Self {
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(pending, _)| pending.value() == tag.value())
        {
            Some(entry) => *entry = (tag, value),
            None => self.entries.push((tag, value)),
        }
        self
    }

    /// Buffer a `u16` value in its converter-defined byte representation.
    pub fn write_u16(&mut self, tag: Tag, value: u16) -> &mut Self {
        let bytes = self.converter.to_bytes_u16(value);
        self.write(tag, Bytes::copy_from_slice(&bytes))
    }

    /// Buffer a `u32` value in its converter-defined byte representation.
    pub fn write_u32(&mut self, tag: Tag, value: u32) -> &mut Self {
        let bytes = self.converter.to_bytes_u32(value);
        self.write(tag, Bytes::copy_from_slice(&bytes))
    }

    /// Number of pending records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode all pending records, in insertion order, into one buffer.
    pub fn serialize(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        for (tag, value) in &self.entries {
            encode_record(*tag, value, &mut buf)?;
        }
        Ok(buf.freeze())
    }
}

impl Default for TlvWriter {
    fn default() -> Self {
        Self::new()
    }
}
