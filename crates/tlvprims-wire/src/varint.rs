use bytes::{BufMut, BytesMut};

use crate::error::{Result, TlvError};

/// Escape byte signaling "this field continues into the next wider chunk".
pub const SENTINEL: u8 = 0x00;

/// Widest possible encoding: two sentinels + 4 data bytes.
pub const VARINT_MAX_SIZE: usize = 6;

/// Encode a non-zero integer as the shortest of 1, 2 or 4 big-endian bytes.
///
/// Values 1-255 take one byte; 256-65535 take a sentinel plus two bytes;
/// anything larger takes two sentinels plus four bytes. Zero collides with
/// the sentinel and is rejected — it has no representation in this scheme.
pub fn encode_varint(value: u32, dst: &mut BytesMut) -> Result<()> {
    if value == 0 {
        return Err(TlvError::InvalidInput(
            "value 0 collides with the escape sentinel",
        ));
    }
    if value <= u8::MAX as u32 {
        dst.put_u8(value as u8);
    } else if value <= u16::MAX as u32 {
        dst.put_u8(SENTINEL);
        dst.put_u16(value as u16);
    } else {
        dst.put_u8(SENTINEL);
        dst.put_u8(SENTINEL);
        dst.put_u32(value);
    }
    Ok(())
}

/// Number of wire bytes [`encode_varint`] emits for `value`.
pub fn varint_size(value: u32) -> usize {
    if value <= u8::MAX as u32 {
        1
    } else if value <= u16::MAX as u32 {
        3
    } else {
        VARINT_MAX_SIZE
    }
}

/// Decode one variable-width integer from the front of `buf`.
///
/// Returns the value and the number of bytes consumed. Sentinel scanning
/// stops once the 4-byte width is reached; the terminal chunk is then read
/// as raw big-endian, so 4-byte values with a zero high byte decode
/// correctly. Input exhausted mid-scan or mid-chunk, or a field that
/// resolves to 0, is a corrupted stream.
pub fn decode_varint(buf: &[u8]) -> Result<(u32, usize)> {
    let mut sentinels = 0usize;
    while sentinels < 2 {
        match buf.get(sentinels) {
            Some(&SENTINEL) => sentinels += 1,
            Some(_) => break,
            None => return Err(TlvError::CorruptedStream),
        }
    }

    let chunk = 1usize << sentinels;
    let end = sentinels + chunk;
    if buf.len() < end {
        return Err(TlvError::CorruptedStream);
    }

    let data = &buf[sentinels..end];
    let value = match chunk {
        1 => data[0] as u32,
        2 => u16::from_be_bytes([data[0], data[1]]) as u32,
        _ => u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
    };

    if value == 0 {
        return Err(TlvError::CorruptedStream);
    }

    Ok((value, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u32) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_varint(value, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn one_byte_lane() {
        assert_eq!(encoded(1), vec![0x01]);
        assert_eq!(encoded(200), vec![0xC8]);
        assert_eq!(encoded(255), vec![0xFF]);
    }

    #[test]
    fn two_byte_lane_carries_one_sentinel() {
        assert_eq!(encoded(256), vec![0x00, 0x01, 0x00]);
        assert_eq!(encoded(2000), vec![0x00, 0x07, 0xD0]);
        assert_eq!(encoded(65535), vec![0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn four_byte_lane_carries_two_sentinels() {
        assert_eq!(encoded(65536), vec![0x00, 0x00, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(
            encoded(u32::MAX),
            vec![0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn zero_is_rejected() {
        let mut buf = BytesMut::new();
        assert!(matches!(
            encode_varint(0, &mut buf),
            Err(TlvError::InvalidInput(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn roundtrip_boundary_values() {
        for value in [1, 255, 256, 65535, 65536, 16777215, u32::MAX] {
            let wire = encoded(value);
            assert_eq!(wire.len(), varint_size(value));
            let (decoded, consumed) = decode_varint(&wire).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, wire.len());
        }
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let (value, consumed) = decode_varint(&[0x05, 0xAA, 0xBB]).unwrap();
        assert_eq!(value, 5);
        assert_eq!(consumed, 1);
    }

    #[test]
    fn zero_high_byte_in_four_byte_chunk() {
        // 65536 encodes with a 0x00 high data byte; scanning must stop at
        // two sentinels instead of swallowing it as a third.
        let (value, consumed) =
            decode_varint(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!(value, 65536);
        assert_eq!(consumed, 6);
    }

    #[test]
    fn lone_sentinel_is_corrupted() {
        assert!(matches!(
            decode_varint(&[0x00]),
            Err(TlvError::CorruptedStream)
        ));
    }

    #[test]
    fn short_chunk_is_corrupted() {
        assert!(matches!(
            decode_varint(&[0x00, 0x01]),
            Err(TlvError::CorruptedStream)
        ));
        assert!(matches!(
            decode_varint(&[0x00, 0x00, 0x01, 0x02]),
            Err(TlvError::CorruptedStream)
        ));
    }

    #[test]
    fn empty_input_is_corrupted() {
        assert!(matches!(decode_varint(&[]), Err(TlvError::CorruptedStream)));
    }

    #[test]
    fn all_sentinel_run_is_corrupted() {
        assert!(matches!(
            decode_varint(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
            Err(TlvError::CorruptedStream)
        ));
    }
}
