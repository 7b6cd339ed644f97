//! Deflate/Inflate wrapper for TLV buffers.
//!
//! A serialized TLV buffer is an opaque byte blob to this crate: it is
//! compressed before transport or storage and decompressed before being
//! handed back to the record decoder. The stream is zlib-framed DEFLATE,
//! processed through a caller-sized work buffer.

use bytes::BytesMut;
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

pub mod error;

pub use error::{CompressError, Result};

/// Compress `data`, reading output through a `buffer_size`-byte chunk.
pub fn deflate(data: &[u8], buffer_size: usize) -> Result<Vec<u8>> {
    if buffer_size == 0 {
        return Err(CompressError::InvalidBufferSize);
    }

    let mut stream = Compress::new(Compression::default(), true);
    let mut out = Vec::with_capacity(data.len());
    let mut chunk = vec![0u8; buffer_size];

    loop {
        let consumed = stream.total_in() as usize;
        let before_out = stream.total_out();
        let status = stream.compress(&data[consumed..], &mut chunk, FlushCompress::Finish)?;
        let produced = (stream.total_out() - before_out) as usize;
        out.extend_from_slice(&chunk[..produced]);

        if matches!(status, Status::StreamEnd) {
            return Ok(out);
        }
    }
}

/// Decompress `data`, reading output through a `buffer_size`-byte chunk.
pub fn inflate(data: &[u8], buffer_size: usize) -> Result<Vec<u8>> {
    if buffer_size == 0 {
        return Err(CompressError::InvalidBufferSize);
    }

    let mut stream = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2));
    let mut chunk = vec![0u8; buffer_size];

    loop {
        let consumed = stream.total_in() as usize;
        let before_out = stream.total_out();
        let status = stream.decompress(&data[consumed..], &mut chunk, FlushDecompress::Finish)?;
        let produced = (stream.total_out() - before_out) as usize;
        out.extend_from_slice(&chunk[..produced]);

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                // No forward progress with input exhausted means the
                // deflate trailer is missing.
                if produced == 0 && stream.total_in() as usize == consumed {
                    return Err(CompressError::Truncated);
                }
            }
        }
    }
}

/// Accumulates data across calls, then compresses or decompresses the
/// whole buffer at once.
///
/// Scratch state for one session, owned by one caller; discard after the
/// finalizing call.
#[derive(Debug, Default)]
pub struct TlvCompressor {
    buf: BytesMut,
}

impl TlvCompressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append data to the accumulation buffer.
    pub fn add(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Number of accumulated bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been added yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Compress everything accumulated so far.
    pub fn deflate(&self, buffer_size: usize) -> Result<Vec<u8>> {
        deflate(&self.buf, buffer_size)
    }

    /// Decompress everything accumulated so far.
    pub fn inflate(&self, buffer_size: usize) -> Result<Vec<u8>> {
        inflate(&self.buf, buffer_size)
    }
}
