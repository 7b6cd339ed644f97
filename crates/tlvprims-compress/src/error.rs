/// Errors that can occur while compressing or decompressing a buffer.
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    /// The underlying deflate stream reported an error.
    #[error("deflate failed: {0}")]
    Deflate(#[from] flate2::CompressError),

    /// The underlying inflate stream reported an error.
    #[error("inflate failed: {0}")]
    Inflate(#[from] flate2::DecompressError),

    /// The compressed stream ended before the deflate trailer.
    #[error("compressed stream ended unexpectedly")]
    Truncated,

    /// The work buffer size must be at least one byte.
    #[error("buffer size must be greater than zero")]
    InvalidBufferSize,
}

pub type Result<T> = std::result::Result<T, CompressError>;
