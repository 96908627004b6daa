// ## 📂 File: `src/headers/types.rs`

//! headers/types.rs
//! Item envelope header and its typed registries.
//!
//! - Fixed 44-byte header, little-endian, written in front of every item.
//! - The encoded header is the AEAD associated data, so any edit to it fails
//!   authentication rather than silently changing how the item is read.
//! - Reserved bytes must be zero.

use std::fmt;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::constants::{ENVELOPE_V1, MAGIC_ENC1, MAX_PBKDF2_ITERATIONS};
use crate::constants::{cipher_ids, kdf_ids};
use crate::utils::{enum_name_or_hex, fmt_bytes};

/// Fixed header size in bytes.
pub const HEADER_LEN_V1: usize = 44;

/// Salt length stored in the header.
pub const SALT_LEN: usize = 16;

/// Cipher suites (header registry).
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CipherSuite {
    Aes256Gcm        = cipher_ids::AES256_GCM,
    Chacha20Poly1305 = cipher_ids::CHACHA20_POLY1305,
}

impl CipherSuite {
    pub fn verify(raw: u16) -> Result<Self, HeaderError> {
        CipherSuite::try_from_primitive(raw).map_err(|_| HeaderError::UnknownCipherSuite { raw })
    }
}

impl Default for CipherSuite {
    fn default() -> Self {
        CipherSuite::Aes256Gcm
    }
}

/// Password-to-key derivations (header registry).
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KdfId {
    Pbkdf2Sha256 = kdf_ids::PBKDF2_SHA256,
    HkdfSha256   = kdf_ids::HKDF_SHA256,
}

impl KdfId {
    pub fn verify(raw: u16) -> Result<Self, HeaderError> {
        KdfId::try_from_primitive(raw).map_err(|_| HeaderError::UnknownKdf { raw })
    }
}

impl Default for KdfId {
    fn default() -> Self {
        KdfId::Pbkdf2Sha256
    }
}

/// Envelope header as written in front of each item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub magic: [u8; 4],          // "ENC1"
    pub version: u16,
    pub cipher: u16,             // CipherSuite
    pub kdf: u16,                // KdfId
    pub reserved: u16,           // must be zero
    pub kdf_iterations: u32,     // PBKDF2 rounds; zero for HKDF
    pub salt: [u8; SALT_LEN],    // random per item
    pub nonce: [u8; 12],         // random per item
}

impl EnvelopeHeader {
    pub const LEN: usize = HEADER_LEN_V1;

    pub fn new(
        cipher: CipherSuite,
        kdf: KdfId,
        kdf_iterations: u32,
        salt: [u8; SALT_LEN],
        nonce: [u8; 12],
    ) -> Self {
        Self {
            magic: MAGIC_ENC1,
            version: ENVELOPE_V1,
            cipher: cipher as u16,
            kdf: kdf as u16,
            reserved: 0,
            kdf_iterations,
            salt,
            nonce,
        }
    }

    /// Canonical header for tests.
    pub fn test_header() -> Self {
        Self::new(CipherSuite::Aes256Gcm, KdfId::HkdfSha256, 0, [0xA5; SALT_LEN], [0x5A; 12])
    }

    pub fn cipher_suite(&self) -> Result<CipherSuite, HeaderError> {
        CipherSuite::verify(self.cipher)
    }

    pub fn kdf_id(&self) -> Result<KdfId, HeaderError> {
        KdfId::verify(self.kdf)
    }

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.magic != MAGIC_ENC1 {
            return Err(HeaderError::InvalidMagic { have: self.magic, need: MAGIC_ENC1 });
        }
        if self.version != ENVELOPE_V1 {
            return Err(HeaderError::InvalidVersion { have: self.version });
        }

        CipherSuite::verify(self.cipher)?;
        match KdfId::verify(self.kdf)? {
            KdfId::Pbkdf2Sha256 => {
                if self.kdf_iterations == 0 || self.kdf_iterations > MAX_PBKDF2_ITERATIONS {
                    return Err(HeaderError::InvalidIterations { have: self.kdf_iterations });
                }
            }
            KdfId::HkdfSha256 => {
                if self.kdf_iterations != 0 {
                    return Err(HeaderError::InvalidIterations { have: self.kdf_iterations });
                }
            }
        }

        if self.reserved != 0 {
            return Err(HeaderError::ReservedBytesNonZero { reserved: self.reserved });
        }
        if self.salt.iter().all(|&b| b == 0) {
            return Err(HeaderError::InvalidSalt);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Buffer too short to contain a header.
    BufferTooShort { have: usize, need: usize },

    /// Invalid magic marker (expected "ENC1").
    InvalidMagic { have: [u8; 4], need: [u8; 4] },

    /// Unsupported version.
    InvalidVersion { have: u16 },

    UnknownCipherSuite { raw: u16 },

    UnknownKdf { raw: u16 },

    /// Iteration count does not fit the KDF.
    InvalidIterations { have: u32 },

    /// Salt is all zeros.
    InvalidSalt,

    ReservedBytesNonZero { reserved: u16 },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HeaderError::*;
        match self {
            BufferTooShort { have, need } =>
                write!(f, "header buffer too short: {} < {}", have, need),
            InvalidMagic { have, need } =>
                write!(f, "invalid magic: expected {}, got {}", fmt_bytes(need), fmt_bytes(have)),
            InvalidVersion { have } =>
                write!(f, "unsupported envelope version: {}", have),
            UnknownCipherSuite { raw } =>
                write!(f, "unknown cipher suite: {}", enum_name_or_hex::<CipherSuite>(*raw)),
            UnknownKdf { raw } =>
                write!(f, "unknown key derivation: {}", enum_name_or_hex::<KdfId>(*raw)),
            InvalidIterations { have } =>
                write!(f, "invalid KDF iteration count: {}", have),
            InvalidSalt =>
                write!(f, "invalid salt: all zeros"),
            ReservedBytesNonZero { reserved } =>
                write!(f, "reserved bytes must be zero, got 0x{:04x}", reserved),
        }
    }
}

impl std::error::Error for HeaderError {}
