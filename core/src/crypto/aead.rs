// ## 📂 File: `src/crypto/aead.rs`

//! src/crypto/aead.rs
//! AEAD interface for AES-256-GCM and ChaCha20-Poly1305.
//!
//! Design notes:
//! - Both ciphers use 32-byte keys and 12-byte nonces.
//! - Tag verification must fail closed (no partial plaintext).
//! - Cipher selection is driven by the envelope header.

use crate::headers::CipherSuite;
use crate::crypto::types::{KEY_LEN_32, NONCE_LEN_12, TAG_LEN};
use crate::crypto::types::CryptoError;

use aes_gcm::aead::{Aead, KeyInit, Payload};

use aes_gcm::{Aes256Gcm, Nonce as AesNonce};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaNonce};

/// Unified AEAD cipher implementation selected by header.cipher.
#[derive(Clone)]
pub enum AeadImpl {
    AesGcm(Aes256Gcm),
    ChaCha(ChaCha20Poly1305),
}

impl AeadImpl {
    /// Construct the AEAD for `suite` keyed with a derived item key.
    pub fn new(suite: CipherSuite, item_key: &[u8]) -> Result<Self, CryptoError> {
        if item_key.len() != KEY_LEN_32 {
            return Err(CryptoError::InvalidKeyLen {
                expected: KEY_LEN_32,
                actual: item_key.len(),
            });
        }

        let bad_len = |_| CryptoError::InvalidKeyLen { expected: KEY_LEN_32, actual: item_key.len() };
        match suite {
            CipherSuite::Aes256Gcm => Ok(Self::AesGcm(Aes256Gcm::new_from_slice(item_key).map_err(bad_len)?)),
            CipherSuite::Chacha20Poly1305 => Ok(Self::ChaCha(ChaCha20Poly1305::new_from_slice(item_key).map_err(bad_len)?)),
        }
    }

    /// Construct from a raw cipher id.
    pub fn from_cipher_id(cipher_id: u16, item_key: &[u8]) -> Result<Self, CryptoError> {
        let suite = CipherSuite::verify(cipher_id)
            .map_err(|_| CryptoError::UnsupportedCipher { cipher_id })?;
        Self::new(suite, item_key)
    }

    /// AEAD seal (encrypt) plaintext with nonce and AAD.
    ///
    /// Empty plaintext is valid and yields a bare tag.
    pub fn seal(
        &self,
        nonce_12: &[u8],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if nonce_12.len() != NONCE_LEN_12 {
            return Err(CryptoError::Failure(format!(
                "nonce length: expected={}, actual={}", NONCE_LEN_12, nonce_12.len()
            )));
        }

        match self {
            AeadImpl::AesGcm(cipher) => {
                cipher
                    .encrypt(AesNonce::from_slice(nonce_12), Payload { msg: plaintext, aad })
                    .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into()))
            }
            AeadImpl::ChaCha(cipher) => {
                cipher
                    .encrypt(ChaNonce::from_slice(nonce_12), Payload { msg: plaintext, aad })
                    .map_err(|_| CryptoError::Failure("ChaCha20-Poly1305 seal failed".into()))
            }
        }
    }

    /// AEAD open (decrypt) ciphertext with nonce and AAD.
    ///
    /// A body shorter than a tag is reported as a tag mismatch: the header
    /// was ours, so the item is damaged rather than foreign.
    pub fn open(
        &self,
        nonce_12: &[u8],
        aad: &[u8],
        ciphertext_and_tag: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if nonce_12.len() != NONCE_LEN_12 {
            return Err(CryptoError::Failure(format!(
                "nonce length: expected={}, actual={}", NONCE_LEN_12, nonce_12.len()
            )));
        }

        if ciphertext_and_tag.len() < TAG_LEN {
            return Err(CryptoError::TagMismatch);
        }

        match self {
            AeadImpl::AesGcm(cipher) => {
                cipher
                    .decrypt(AesNonce::from_slice(nonce_12), Payload { msg: ciphertext_and_tag, aad })
                    .map_err(|_| CryptoError::TagMismatch)
            }
            AeadImpl::ChaCha(cipher) => {
                cipher
                    .decrypt(ChaNonce::from_slice(nonce_12), Payload { msg: ciphertext_and_tag, aad })
                    .map_err(|_| CryptoError::TagMismatch)
            }
        }
    }
}
