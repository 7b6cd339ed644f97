//! Integer/byte conversion seam.
//!
//! Callers with a custom numeric codec can plug their own [`Converter`]
//! into a writer; the default behaves exactly as the fixed-width
//! big-endian conversion underlying the wire format.

use crate::error::{Result, TlvError};

/// Converts between fixed-width byte representations and integers.
pub trait Converter {
    /// Widen a 1, 2 or 4-byte big-endian representation to a `u32`.
    fn to_int(&self, bytes: &[u8]) -> Result<u32>;

    /// The 2-byte representation of `value`.
    fn to_bytes_u16(&self, value: u16) -> [u8; 2];

    /// The 4-byte representation of `value`.
    fn to_bytes_u32(&self, value: u32) -> [u8; 4];
}

/// Default converter: big-endian, the wire format's native byte order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigEndian;

impl Converter for BigEndian {
    fn to_int(&self, bytes: &[u8]) -> Result<u32> {
        match bytes.len() {
            1 => Ok(bytes[0] as u32),
            2 => Ok(u16::from_be_bytes([bytes[0], bytes[1]]) as u32),
            4 => Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
            width => Err(TlvError::InvalidTagWidth { width }),
        }
    }

    fn to_bytes_u16(&self, value: u16) -> [u8; 2] {
        value.to_be_bytes()
    }

    fn to_bytes_u32(&self, value: u32) -> [u8; 4] {
        value.to_be_bytes()
    }
}
