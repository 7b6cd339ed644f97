/// Errors that can occur while sealing or opening a buffer.
///
/// Messages intentionally avoid including secrets or plaintext.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The sealed input is too short or otherwise not in the expected
    /// `salt || nonce || ciphertext` layout.
    #[error("invalid sealed format: {0}")]
    InvalidFormat(&'static str),

    /// Encryption failed. Rare with AES-GCM; usually a programming error.
    #[error("encryption failed")]
    EncryptFailed,

    /// Decryption failed: wrong secret, or corrupted/tampered data.
    #[error("decryption failed (wrong secret or corrupted data)")]
    DecryptFailed,
}

pub type Result<T> = std::result::Result<T, CryptoError>;
