// ## 📂 File: `src/constants.rs`

/// Magic number for the item envelope.
/// "ENC1" = encrypted dataset item, envelope v1
pub const MAGIC_ENC1: [u8; 4] = *b"ENC1";
pub const ENVELOPE_V1: u16 = 1;

/// File suffix marking an encrypted item (without the dot).
pub const ENCRYPTED_SUFFIX: &str = "enc";

/// Suffixes accepted by dataset discovery by default.
pub const DEFAULT_ALLOWED_SUFFIXES: &[&str] = &["jpeg", "jpg", "png", ENCRYPTED_SUFFIX];

/// Optional manifest listing item file names, one per line.
pub const MANIFEST_FILE_NAME: &str = "data_file.txt";

/// Shuffle seed used when the caller does not pick one.
pub const DEFAULT_SHUFFLE_SEED: u64 = 1729;

/// Number of decrypt workers when nothing else is configured.
pub const DEFAULT_POOL_SIZE: usize = 2;
/// Upper bound for `PoolConfig::auto`; decryption workers beyond this starve
/// the presentation thread without shortening the prefetch horizon.
pub const MAX_AUTO_POOL_SIZE: usize = 4;

/// In-flight credits for bulk sweeps when nothing else is configured.
pub const DEFAULT_PIPELINE_CREDITS: usize = 4;

/// PBKDF2 work factor for newly written envelopes.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
/// Envelopes asking for more than this are rejected as malformed.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Cipher suite identifiers (mirrored in headers).
pub mod cipher_ids {
    pub const AES256_GCM: u16        = 0x0001;
    pub const CHACHA20_POLY1305: u16 = 0x0002;
}

/// Key derivation identifiers (mirrored in headers).
pub mod kdf_ids {
    /// PBKDF2-HMAC-SHA256, iterations taken from the header.
    pub const PBKDF2_SHA256: u16 = 0x0001;
    /// HKDF-SHA256 straight over the password bytes; no work factor.
    pub const HKDF_SHA256: u16   = 0x0002;
}

/// HKDF info string binding derived keys to this envelope format.
pub const HKDF_INFO: &[u8] = b"ENC1|item-key";
