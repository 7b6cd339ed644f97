//! Password-based sealing for serialized TLV buffers.
//!
//! A fully serialized TLV buffer is sealed as an opaque blob:
//!
//! ```text
//! ┌───────────┬───────────┬────────────────────────┐
//! │   Salt    │   Nonce   │   Ciphertext + Tag     │
//! │ 16 bytes  │ 12 bytes  │       N bytes          │
//! └───────────┴───────────┴────────────────────────┘
//! ```
//!
//! The salt is freshly random per seal; the key is derived from the
//! caller's secret with PBKDF2-HMAC-SHA256 and zeroized after use. The
//! body is AES-256-GCM, so tampering is detected when opening.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use bytes::BytesMut;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod error;

pub use error::{CryptoError, Result};

/// Size of the random salt prepended to every sealed buffer.
pub const SALT_LEN: usize = 16;

/// Size of the AES-GCM nonce.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Size of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Minimum valid sealed size (salt + nonce + tag, empty plaintext).
pub const MIN_SEALED_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

const PBKDF2_ROUNDS: u32 = 10_000;

/// Derived key material, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct DerivedKey([u8; KEY_LEN]);

fn derive_key(secret: &str, salt: &[u8]) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    DerivedKey(key)
}

/// Seal `data` under a key derived from `secret`.
///
/// A fresh random salt and nonce are generated per call, so sealing the
/// same data twice yields different bytes.
pub fn encrypt(data: &[u8], secret: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(secret, &salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, data)
        .map_err(|_| CryptoError::EncryptFailed)?;

    let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(nonce.as_slice());
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Open a sealed buffer with the same `secret` it was sealed under.
///
/// Reads the leading salt, re-derives the key, then authenticates and
/// decrypts the body.
pub fn decrypt(data: &[u8], secret: &str) -> Result<Vec<u8>> {
    if data.len() < MIN_SEALED_LEN {
        return Err(CryptoError::InvalidFormat(
            "sealed input shorter than salt, nonce and tag",
        ));
    }

    let (salt, rest) = data.split_at(SALT_LEN);
    let (nonce, body) = rest.split_at(NONCE_LEN);

    let key = derive_key(secret, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));

    cipher
        .decrypt(Nonce::from_slice(nonce), body)
        .map_err(|_| CryptoError::DecryptFailed)
}

/// Accumulates data across calls, then seals or opens the whole buffer.
///
/// Scratch state for one session, owned by one caller; discard after the
/// finalizing call.
#[derive(Default)]
pub struct TlvCrypto {
    buf: BytesMut,
}

impl TlvCrypto {
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

    /// Seal everything accumulated so far.
    pub fn encrypt(&self, secret: &str) -> Result<Vec<u8>> {
        encrypt(&self.buf, secret)
    }

    /// Open everything accumulated so far.
    pub fn decrypt(&self, secret: &str) -> Result<Vec<u8>> {
        decrypt(&self.buf, secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let sealed = encrypt(b"tlv payload", "hunter2").unwrap();
        assert_eq!(sealed.len(), MIN_SEALED_LEN + b"tlv payload".len());

        let opened = decrypt(&sealed, "hunter2").unwrap();
        assert_eq!(opened, b"tlv payload");
    }

    #[test]
    fn wrong_secret_fails() {
        let sealed = encrypt(b"tlv payload", "hunter2").unwrap();
        assert!(matches!(
            decrypt(&sealed, "hunter3"),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn salts_and_nonces_are_fresh() {
        let a = encrypt(b"same", "secret").unwrap();
        let b = encrypt(b"same", "secret").unwrap();
        assert_ne!(a, b);

        assert_eq!(decrypt(&a, "secret").unwrap(), b"same");
        assert_eq!(decrypt(&b, "secret").unwrap(), b"same");
    }

    #[test]
    fn tampering_is_detected() {
        let mut sealed = encrypt(b"tlv payload", "hunter2").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;

        assert!(matches!(
            decrypt(&sealed, "hunter2"),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn short_input_is_invalid_format() {
        assert!(matches!(
            decrypt(&[0u8; MIN_SEALED_LEN - 1], "secret"),
            Err(CryptoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let sealed = encrypt(b"", "secret").unwrap();
        assert_eq!(sealed.len(), MIN_SEALED_LEN);
        assert_eq!(decrypt(&sealed, "secret").unwrap(), b"");
    }

    #[test]
    fn accumulator_roundtrip() {
        let mut sealer = TlvCrypto::new();
        sealer.add(b"first ").add(b"second");
        let sealed = sealer.encrypt("secret").unwrap();

        let mut opener = TlvCrypto::new();
        opener.add(&sealed);
        assert_eq!(opener.decrypt("secret").unwrap(), b"first second");
    }
}
