/// Errors that can occur during TLV encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum TlvError {
    /// A required input was missing, empty, or below the minimum usable size.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A tag representation was not exactly 1, 2 or 4 bytes.
    #[error("invalid tag width ({width} bytes, expected 1, 2 or 4)")]
    InvalidTagWidth { width: usize },

    /// A variable-width field could not be resolved before input ran out.
    #[error("corrupted stream (unresolved escape sequence)")]
    CorruptedStream,

    /// A record's declared value length exceeds the configured maximum.
    #[error("value too large ({size} bytes, max {max})")]
    ValueTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, TlvError>;
