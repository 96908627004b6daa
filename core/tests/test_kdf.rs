#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use encdata_core::{
        crypto::{derive_item_key_32, CryptoError},
        headers::{CipherSuite, EnvelopeHeader, KdfId},
    };

    fn header(kdf: KdfId, iterations: u32, salt: [u8; 16]) -> EnvelopeHeader {
        EnvelopeHeader::new(CipherSuite::Aes256Gcm, kdf, iterations, salt, [7; 12])
    }

    #[test]
    fn test_hkdf_derivation_changes_with_salt() {
        let k1 = derive_item_key_32(b"password", &header(KdfId::HkdfSha256, 0, [1; 16])).unwrap();
        let k2 = derive_item_key_32(b"password", &header(KdfId::HkdfSha256, 0, [2; 16])).unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_pbkdf2_derivation_changes_with_iterations() {
        let k1 = derive_item_key_32(b"password", &header(KdfId::Pbkdf2Sha256, 1, [1; 16])).unwrap();
        let k2 = derive_item_key_32(b"password", &header(KdfId::Pbkdf2Sha256, 2, [1; 16])).unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_kdfs_do_not_collide() {
        let salt = [3; 16];
        let hk = derive_item_key_32(b"password", &header(KdfId::HkdfSha256, 0, salt)).unwrap();
        let pb = derive_item_key_32(b"password", &header(KdfId::Pbkdf2Sha256, 1, salt)).unwrap();
        assert_ne!(hk, pb);
    }

    #[test]
    fn test_pbkdf2_zero_iterations_rejected() {
        let err = derive_item_key_32(b"password", &header(KdfId::Pbkdf2Sha256, 0, [1; 16])).unwrap_err();
        assert!(matches!(err, CryptoError::Failure(_)));
    }

    #[test]
    fn test_unknown_kdf_rejected() {
        let mut h = header(KdfId::HkdfSha256, 0, [1; 16]);
        h.kdf = 0x0042;
        let err = derive_item_key_32(b"password", &h).unwrap_err();
        assert!(matches!(err, CryptoError::Header(_)));
    }

    // Property-based fuzzing: arbitrary salts and passwords produce deterministic keys
    proptest! {
        #[test]
        fn prop_hkdf_deterministic(salt in any::<[u8; 16]>(), password in proptest::collection::vec(any::<u8>(), 0..64)) {
            let h = header(KdfId::HkdfSha256, 0, salt);
            let k1 = derive_item_key_32(&password, &h).unwrap();
            let k2 = derive_item_key_32(&password, &h).unwrap();
            prop_assert_eq!(k1, k2);
        }

        #[test]
        fn prop_pbkdf2_deterministic(salt in any::<[u8; 16]>(), iterations in 1u32..16) {
            let h = header(KdfId::Pbkdf2Sha256, iterations, salt);
            let k1 = derive_item_key_32(b"masterkey", &h).unwrap();
            let k2 = derive_item_key_32(b"masterkey", &h).unwrap();
            prop_assert_eq!(k1, k2);
        }
    }
}
