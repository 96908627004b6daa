// ## 📂 File: `src/headers/decode.rs`
//! src/headers/decode.rs
//!
//! Header decoding.
//!
//! - Reads the fixed 44-byte prefix of an item into `EnvelopeHeader`.
//! - Field order must match `encode.rs` exactly.
//! - Any failure here means "not an encrypted item", never "wrong password".

use crate::headers::types::{EnvelopeHeader, HeaderError, SALT_LEN};

/// Deserialize the header at the front of `buf`.
///
/// Returns the header and the remaining ciphertext slice.
#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<(EnvelopeHeader, &[u8]), HeaderError> {
    if buf.len() < EnvelopeHeader::LEN {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: EnvelopeHeader::LEN });
    }

    let mut i = 0usize;
    #[inline] fn get_u16(buf: &[u8], i: &mut usize) -> u16 { let v = u16::from_le_bytes([buf[*i], buf[*i + 1]]); *i += 2; v }
    #[inline] fn get_u32(buf: &[u8], i: &mut usize) -> u32 { let v = u32::from_le_bytes([buf[*i], buf[*i + 1], buf[*i + 2], buf[*i + 3]]); *i += 4; v }
    #[inline] fn get_bytes<const N: usize>(buf: &[u8], i: &mut usize) -> [u8; N] {
        let mut dst = [0u8; N]; dst.copy_from_slice(&buf[*i..*i + N]); *i += N; dst
    }

    let h = EnvelopeHeader {
        magic:          get_bytes::<4>(buf, &mut i),         // 0..4
        version:        get_u16(buf, &mut i),                // 4..6
        cipher:         get_u16(buf, &mut i),                // 6..8
        kdf:            get_u16(buf, &mut i),                // 8..10
        reserved:       get_u16(buf, &mut i),                // 10..12
        kdf_iterations: get_u32(buf, &mut i),                // 12..16
        salt:           get_bytes::<SALT_LEN>(buf, &mut i),  // 16..32
        nonce:          get_bytes::<12>(buf, &mut i),        // 32..44
    };

    debug_assert_eq!(i, EnvelopeHeader::LEN);

    h.validate()?;

    Ok((h, &buf[EnvelopeHeader::LEN..]))
}

/// Cheap check used by discovery and the CLI: does `buf` start like an envelope?
pub fn looks_like_envelope(buf: &[u8]) -> bool {
    decode_header_le(buf).is_ok()
}
