use std::collections::BTreeMap;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::{decode_record, DecodeConfig, Tag, RECORD_MIN_SIZE};
use crate::error::{Result, TlvError};

/// Accumulates raw TLV bytes and extracts records from them.
///
/// `read` may be called any number of times as data arrives; each lookup
/// re-scans the full accumulated buffer from the start, so a record whose
/// trailing bytes arrive in a later `read` becomes visible then. No cursor
/// is retained between calls.
///
/// A reader is scratch state for one decode session, owned by one caller.
pub struct TlvReader {
    buf: BytesMut,
    config: DecodeConfig,
}

impl TlvReader {
    /// Create a reader with default limits.
    pub fn new() -> Self {
        Self::with_config(DecodeConfig::default())
    }

    /// Create a reader with explicit limits.
    pub fn with_config(config: DecodeConfig) -> Self {
        Self {
            buf: BytesMut::new(),
            config,
        }
    }

    /// Append raw TLV bytes to the accumulation buffer.
    pub fn read(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Number of accumulated bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been read yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current decode configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Extract the value of the first record carrying `tag`.
    ///
    /// Returns `Ok(None)` when the tag does not appear in the buffer —
    /// an absent tag is a normal outcome, not an error.
    pub fn parse(&self, tag: Tag) -> Result<Option<Bytes>> {
        let mut scan = self.scan_buffer()?;
        while let Some(record) = decode_record(&mut scan, self.config.max_value_size)? {
            if record.tag.value() == tag.value() {
                return Ok(Some(record.value));
            }
        }
        Ok(None)
    }

    /// Extract every record, keyed by numeric tag value.
    ///
    /// The first occurrence of a duplicate tag wins; later duplicates are
    /// still parsed to keep the cursor aligned, their values discarded.
    pub fn parse_all(&self) -> Result<BTreeMap<u32, Bytes>> {
        let mut scan = self.scan_buffer()?;
        let mut map = BTreeMap::new();
        while let Some(record) = decode_record(&mut scan, self.config.max_value_size)? {
            let tag = record.tag.value();
            if map.contains_key(&tag) {
                trace!(tag, "skipping duplicate tag");
                continue;
            }
            map.insert(tag, record.value);
        }
        if !scan.is_empty() {
            debug!(remaining = scan.len(), "trailing bytes not yet parseable");
        }
        Ok(map)
    }

    fn scan_buffer(&self) -> Result<BytesMut> {
        if self.buf.len() < RECORD_MIN_SIZE {
            return Err(TlvError::InvalidInput(
                "buffer shorter than the minimum record size",
            ));
        }
        Ok(self.buf.clone())
    }
}

impl Default for TlvReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_record;

    fn wire(records: &[(u32, &[u8])]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for (tag, value) in records {
            encode_record(Tag::new(*tag).unwrap(), value, &mut buf).unwrap();
        }
        buf.to_vec()
    }

    #[test]
    fn parse_finds_value_by_tag() {
        let mut reader = TlvReader::new();
        reader.read(&wire(&[(1, b"one"), (2, b"two")]));

        let value = reader.parse(Tag::new(2).unwrap()).unwrap().unwrap();
        assert_eq!(value.as_ref(), b"two");
    }

    #[test]
    fn absent_tag_is_not_an_error() {
        let mut reader = TlvReader::new();
        reader.read(&wire(&[(1, b"one")]));

        assert!(reader.parse(Tag::new(9).unwrap()).unwrap().is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let mut reader = TlvReader::new();
        reader.read(&wire(&[(1, b"A"), (1, b"B"), (2, b"C")]));

        let value = reader.parse(Tag::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(value.as_ref(), b"A");

        let map = reader.parse_all().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&1].as_ref(), b"A");
        assert_eq!(map[&2].as_ref(), b"C");
    }

    #[test]
    fn duplicate_scan_still_reaches_later_records() {
        // The duplicate's value bytes must be skipped, not re-parsed.
        let mut reader = TlvReader::new();
        reader.read(&wire(&[(1, b"A"), (1, b"BBBBBBBB"), (3, b"tail")]));

        let map = reader.parse_all().unwrap();
        assert_eq!(map[&3].as_ref(), b"tail");
    }

    #[test]
    fn truncated_trailing_record_is_omitted_silently() {
        let mut full = wire(&[(1, b"one"), (2, b"twotwo")]);
        full.truncate(full.len() - 3);

        let mut reader = TlvReader::new();
        reader.read(&full);

        let map = reader.parse_all().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&1].as_ref(), b"one");
        assert!(reader.parse(Tag::new(2).unwrap()).unwrap().is_none());
    }

    #[test]
    fn truncated_record_completes_on_later_read() {
        let full = wire(&[(1, b"payload")]);
        let (head, tail) = full.split_at(4);

        let mut reader = TlvReader::new();
        reader.read(head);
        assert!(reader.parse(Tag::new(1).unwrap()).unwrap().is_none());

        reader.read(tail);
        let value = reader.parse(Tag::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(value.as_ref(), b"payload");
    }

    #[test]
    fn chained_reads_accumulate() {
        let full = wire(&[(1, b"one"), (2, b"two")]);
        let (head, tail) = full.split_at(3);

        let mut reader = TlvReader::new();
        reader.read(head).read(tail);

        assert_eq!(reader.len(), full.len());
        assert_eq!(reader.parse_all().unwrap().len(), 2);
    }

    #[test]
    fn undersized_buffer_is_invalid_input() {
        let mut reader = TlvReader::new();
        reader.read(&[0x01, 0x01]);

        assert!(matches!(
            reader.parse(Tag::new(1).unwrap()),
            Err(TlvError::InvalidInput(_))
        ));
        assert!(matches!(
            reader.parse_all(),
            Err(TlvError::InvalidInput(_))
        ));
    }

    #[test]
    fn unresolved_sentinel_run_is_corrupted() {
        let mut reader = TlvReader::new();
        reader.read(&wire(&[(1, b"ok")])).read(&[0x05, 0x00, 0x00]);

        assert!(matches!(
            reader.parse_all(),
            Err(TlvError::CorruptedStream)
        ));
        assert!(matches!(
            reader.parse(Tag::new(1).unwrap()),
            Ok(Some(_))
        ));
    }

    #[test]
    fn oversized_length_field_respects_config() {
        let cfg = DecodeConfig { max_value_size: 4 };
        let mut reader = TlvReader::with_config(cfg);
        reader.read(&wire(&[(1, b"too-long-for-cap")]));

        assert!(matches!(
            reader.parse_all(),
            Err(TlvError::ValueTooLarge { .. })
        ));
    }

    #[test]
    fn parse_does_not_retain_position() {
        let mut reader = TlvReader::new();
        reader.read(&wire(&[(1, b"one"), (2, b"two")]));

        // Same result on repeated calls; each scan starts from byte zero.
        for _ in 0..3 {
            assert_eq!(
                reader.parse(Tag::new(1).unwrap()).unwrap().unwrap().as_ref(),
                b"one"
            );
        }
    }
}
