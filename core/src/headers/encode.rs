// ## 📂 File: `src/headers/encode.rs`
//! src/headers/encode.rs
//!
//! Header encoding.
//!
//! - Serializes `EnvelopeHeader` into a fixed 44-byte buffer, little-endian.
//! - Field order must match `decode.rs` exactly.
//! - The output doubles as AEAD associated data.

use crate::headers::types::{EnvelopeHeader, HeaderError, HEADER_LEN_V1};

/// Serialize an `EnvelopeHeader` into a 44-byte buffer.
///
/// Validates first so an encrypt call can never emit a header that its own
/// decoder would reject.
#[inline]
pub fn encode_header_le(h: &EnvelopeHeader) -> Result<[u8; HEADER_LEN_V1], HeaderError> {
    h.validate()?;

    let mut out = [0u8; HEADER_LEN_V1];
    let mut i = 0usize;

    fn put_u16(out: &mut [u8], i: &mut usize, v: u16) {
        out[*i..*i + 2].copy_from_slice(&v.to_le_bytes());
        *i += 2;
    }
    fn put_u32(out: &mut [u8], i: &mut usize, v: u32) {
        out[*i..*i + 4].copy_from_slice(&v.to_le_bytes());
        *i += 4;
    }
    fn put_bytes(out: &mut [u8], i: &mut usize, b: &[u8]) {
        out[*i..*i + b.len()].copy_from_slice(b);
        *i += b.len();
    }

    put_bytes(&mut out, &mut i, &h.magic);        // 0..4   magic
    put_u16(&mut out, &mut i, h.version);         // 4..6   version
    put_u16(&mut out, &mut i, h.cipher);          // 6..8   cipher suite
    put_u16(&mut out, &mut i, h.kdf);             // 8..10  key derivation
    put_u16(&mut out, &mut i, h.reserved);        // 10..12 reserved
    put_u32(&mut out, &mut i, h.kdf_iterations);  // 12..16 KDF iterations
    put_bytes(&mut out, &mut i, &h.salt);         // 16..32 salt
    put_bytes(&mut out, &mut i, &h.nonce);        // 32..44 nonce

    debug_assert_eq!(i, HEADER_LEN_V1, "encoding wrote incorrect length");

    Ok(out)
}
