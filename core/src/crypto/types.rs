// ## 📂 File: `src/crypto/types.rs`

use std::fmt;
use std::sync::Arc;

use crate::headers::HeaderError;
use crate::utils::enum_name_or_hex;
use crate::headers::CipherSuite;

/// Stable key size for both AEADs.
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM and ChaCha20-Poly1305.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Password bytes shared read-only by the codec and every worker.
///
/// The bytes are the UTF-8 encoding of the password, untouched. Stretching
/// into a cipher key happens per item inside the codec.
#[derive(Clone, PartialEq, Eq)]
pub struct Key(Arc<[u8]>);

impl Key {
    pub fn from_password(password: &str) -> Self {
        Key(Arc::from(password.as_bytes()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Key(Arc::from(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(<{} bytes redacted>)", self.0.len())
    }
}

#[derive(Debug)]
pub enum CryptoError {
    /// Unsupported cipher suite id.
    UnsupportedCipher { cipher_id: u16 },

    /// Invalid key length provided to cipher.
    InvalidKeyLen { expected: usize, actual: usize },

    /// AEAD tag mismatch: wrong key or altered bytes.
    TagMismatch,

    /// Envelope header unreadable: the input is not one of our items.
    Header(HeaderError),

    /// General derivation or runtime error with context.
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            UnsupportedCipher { cipher_id } =>
                write!(f, "unsupported cipher suite: {}",
                       enum_name_or_hex::<CipherSuite>(*cipher_id)),
            InvalidKeyLen { expected, actual } =>
                write!(f, "invalid key length: expected={}, actual={}", expected, actual),
            TagMismatch =>
                write!(f, "AEAD tag mismatch"),
            Header(e) =>
                write!(f, "envelope error: {}", e),
            Failure(msg) =>
                write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<HeaderError> for CryptoError {
    fn from(e: HeaderError) -> Self {
        CryptoError::Header(e)
    }
}
