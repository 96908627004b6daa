// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! Per-item key derivation from password bytes and the header salt.
//!
//! - PBKDF2-HMAC-SHA256: default for new items; iteration count lives in the header.
//! - HKDF-SHA256: no work factor. Extract(salt, password) then Expand(info).
//!   Fast, but only as strong as the password itself.

use crate::constants::HKDF_INFO;
use crate::crypto::types::{CryptoError, KEY_LEN_32};
use crate::headers::{EnvelopeHeader, KdfId};

use hkdf::Hkdf;
use sha2::Sha256;

/// Derive the 32-byte AEAD key for one item.
///
/// Errors:
/// - Unknown KDF id or an iteration count that does not fit the KDF.
#[inline]
pub fn derive_item_key_32(
    password: &[u8],
    header: &EnvelopeHeader,
) -> Result<[u8; KEY_LEN_32], CryptoError> {
    let mut key = [0u8; KEY_LEN_32];

    match header.kdf_id()? {
        KdfId::Pbkdf2Sha256 => {
            if header.kdf_iterations == 0 {
                return Err(CryptoError::Failure("PBKDF2 iterations must be ≥1".into()));
            }
            pbkdf2::pbkdf2_hmac::<Sha256>(password, &header.salt, header.kdf_iterations, &mut key);
        }
        KdfId::HkdfSha256 => {
            let hk = Hkdf::<Sha256>::new(Some(&header.salt), password);
            hk.expand(HKDF_INFO, &mut key)
                .map_err(|_| CryptoError::Failure("HKDF expand failed (SHA-256)".into()))?;
        }
    }

    Ok(key)
}
