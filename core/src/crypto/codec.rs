// ## 📂 File: `src/crypto/codec.rs`

//! crypto/codec.rs
//! Whole-buffer item codec: `encrypt(key, plaintext)` / `decrypt(key, ciphertext)`.
//!
//! Wire format per item: `EnvelopeHeader (44 bytes) || ciphertext || tag`.
//! The encoded header is the AEAD associated data.
//!
//! Failure classes callers rely on:
//! - `CryptoError::Header(_)`  → bytes are not an envelope (format error)
//! - `CryptoError::TagMismatch` → wrong password or tampered item

use log::trace;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PBKDF2_ITERATIONS, MAX_PBKDF2_ITERATIONS};
use crate::crypto::aead::AeadImpl;
use crate::crypto::kdf::derive_item_key_32;
use crate::crypto::types::{CryptoError, Key, NONCE_LEN_12, TAG_LEN};
use crate::headers::{decode_header_le, encode_header_le, CipherSuite, EnvelopeHeader, KdfId, SALT_LEN};

/// Parameters used when writing new items. Reading always follows the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub cipher: CipherSuite,
    pub kdf: KdfId,
    /// PBKDF2 rounds; ignored for HKDF.
    pub iterations: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            cipher: CipherSuite::default(),
            kdf: KdfId::default(),
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl CodecConfig {
    /// No work factor; for tests and for archives that must stay fast to open.
    pub fn fast() -> Self {
        Self { kdf: KdfId::HkdfSha256, iterations: 0, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.kdf == KdfId::Pbkdf2Sha256
            && (self.iterations == 0 || self.iterations > MAX_PBKDF2_ITERATIONS)
        {
            return Err(CryptoError::Failure(format!(
                "PBKDF2 iterations must be in 1..={}, got {}",
                MAX_PBKDF2_ITERATIONS, self.iterations
            )));
        }
        Ok(())
    }

    fn header_iterations(&self) -> u32 {
        match self.kdf {
            KdfId::Pbkdf2Sha256 => self.iterations,
            KdfId::HkdfSha256 => 0,
        }
    }
}

/// Stateless item codec. Cheap to clone and share across workers.
#[derive(Debug, Clone, Default)]
pub struct CryptoCodec {
    config: CodecConfig,
}

impl CryptoCodec {
    pub fn new(config: CodecConfig) -> Result<Self, CryptoError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encrypt with a fresh random salt and nonce.
    pub fn encrypt(&self, key: &Key, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN_12];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);
        self.encrypt_with(key, plaintext, salt, nonce)
    }

    /// Encrypt with caller-chosen salt and nonce.
    ///
    /// Never reuse a `(salt, nonce)` pair under the same password; this entry
    /// point exists for reproducible fixtures.
    pub fn encrypt_with(
        &self,
        key: &Key,
        plaintext: &[u8],
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN_12],
    ) -> Result<Vec<u8>, CryptoError> {
        let header = EnvelopeHeader::new(
            self.config.cipher,
            self.config.kdf,
            self.config.header_iterations(),
            salt,
            nonce,
        );
        let aad = encode_header_le(&header)?;

        let item_key = derive_item_key_32(key.as_bytes(), &header)?;
        let aead = AeadImpl::new(self.config.cipher, &item_key)?;
        let sealed = aead.seal(&header.nonce, &aad, plaintext)?;

        let mut out = Vec::with_capacity(EnvelopeHeader::LEN + sealed.len());
        out.extend_from_slice(&aad);
        out.extend_from_slice(&sealed);
        trace!("[CODEC] sealed {} plaintext bytes into {} bytes", plaintext.len(), out.len());
        Ok(out)
    }

    /// Decrypt an item using the parameters recorded in its header.
    pub fn decrypt(&self, key: &Key, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (header, body) = decode_header_le(ciphertext)?;
        let aad = &ciphertext[..EnvelopeHeader::LEN];

        if body.len() < TAG_LEN {
            return Err(CryptoError::TagMismatch);
        }

        let item_key = derive_item_key_32(key.as_bytes(), &header)?;
        let aead = AeadImpl::from_cipher_id(header.cipher, &item_key)?;
        let plaintext = aead.open(&header.nonce, aad, body)?;
        trace!("[CODEC] opened {} bytes into {} plaintext bytes", ciphertext.len(), plaintext.len());
        Ok(plaintext)
    }
}

/// Free-function form of [`CryptoCodec::encrypt`] with default parameters.
pub fn encrypt(key: &Key, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    CryptoCodec::default().encrypt(key, plaintext)
}

/// Free-function form of [`CryptoCodec::decrypt`].
pub fn decrypt(key: &Key, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    CryptoCodec::default().decrypt(key, ciphertext)
}
