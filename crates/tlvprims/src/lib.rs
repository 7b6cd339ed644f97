//! Escape-byte TLV codec with compression and password-sealing helpers.
//!
//! tlvprims encodes small integer identifiers against byte-string payloads
//! in a compact, self-delimiting binary form: tags and lengths use a 1, 2
//! or 4-byte escape-based variable-width encoding, values follow inline.
//!
//! # Crate Structure
//!
//! - [`wire`] — VarWidth codec, record encode/decode, batch accumulators
//! - [`compress`] — Deflate/Inflate wrapper (behind `compress` feature)
//! - [`crypto`] — password-based sealing (behind `crypto` feature)

/// Re-export wire codec types.
pub mod wire {
    pub use tlvprims_wire::*;
}

/// Re-export compression types (requires `compress` feature).
#[cfg(feature = "compress")]
pub mod compress {
    pub use tlvprims_compress::*;
}

/// Re-export sealing types (requires `crypto` feature).
#[cfg(feature = "crypto")]
pub mod crypto {
    pub use tlvprims_crypto::*;
}
