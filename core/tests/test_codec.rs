// Item codec: round trips, wrong keys, tampering, and the format/auth split.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use encdata_core::{
        crypto::{self, CodecConfig, CryptoCodec, CryptoError, Key, TAG_LEN},
        headers::{decode_header_le, CipherSuite, EnvelopeHeader, KdfId},
    };

    fn fast_codec() -> CryptoCodec {
        CryptoCodec::new(CodecConfig::fast()).unwrap()
    }

    #[test]
    fn roundtrip_default_config() {
        let key = Key::from_password("hunter2");
        let pt = b"\xFF\xD8\xFF\xE0 pretend jpeg";
        let ct = crypto::encrypt(&key, pt).unwrap();
        assert_eq!(ct.len(), EnvelopeHeader::LEN + pt.len() + TAG_LEN);
        assert_eq!(crypto::decrypt(&key, &ct).unwrap(), pt);
    }

    #[test]
    fn roundtrip_chacha_pbkdf2() {
        let codec = CryptoCodec::new(CodecConfig {
            cipher: CipherSuite::Chacha20Poly1305,
            kdf: KdfId::Pbkdf2Sha256,
            iterations: 1_000,
        })
        .unwrap();
        let key = Key::from_password("pw");
        let ct = codec.encrypt(&key, b"payload").unwrap();

        let (h, _) = decode_header_le(&ct).unwrap();
        assert_eq!(h.cipher_suite().unwrap(), CipherSuite::Chacha20Poly1305);
        assert_eq!(h.kdf_iterations, 1_000);

        // Reading follows the header, not the reader's config.
        assert_eq!(fast_codec().decrypt(&key, &ct).unwrap(), b"payload");
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let key = Key::from_password("pw");
        let ct = fast_codec().encrypt(&key, b"").unwrap();
        assert_eq!(ct.len(), EnvelopeHeader::LEN + TAG_LEN);
        assert!(fast_codec().decrypt(&key, &ct).unwrap().is_empty());
    }

    #[test]
    fn fresh_salt_and_nonce_per_item() {
        let key = Key::from_password("pw");
        let a = fast_codec().encrypt(&key, b"same").unwrap();
        let b = fast_codec().encrypt(&key, b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn encrypt_with_is_reproducible() {
        let key = Key::from_password("pw");
        let a = fast_codec().encrypt_with(&key, b"same", [9; 16], [8; 12]).unwrap();
        let b = fast_codec().encrypt_with(&key, b"same", [9; 16], [8; 12]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_key_is_tag_mismatch() {
        let ct = fast_codec().encrypt(&Key::from_password("right"), b"secret").unwrap();
        let err = fast_codec().decrypt(&Key::from_password("wrong"), &ct).unwrap_err();
        assert!(matches!(err, CryptoError::TagMismatch));
    }

    #[test]
    fn tampered_body_or_header_is_tag_mismatch() {
        let key = Key::from_password("pw");
        let ct = fast_codec().encrypt(&key, b"secret bytes").unwrap();

        let mut body = ct.clone();
        let last = body.len() - 1;
        body[last] ^= 0x01;
        assert!(matches!(fast_codec().decrypt(&key, &body), Err(CryptoError::TagMismatch)));

        // Still a valid header, but it is bound as associated data.
        let mut header = ct.clone();
        header[EnvelopeHeader::LEN - 1] ^= 0x01;
        assert!(matches!(fast_codec().decrypt(&key, &header), Err(CryptoError::TagMismatch)));
    }

    #[test]
    fn truncated_body_is_tag_mismatch() {
        let key = Key::from_password("pw");
        let ct = fast_codec().encrypt(&key, b"secret").unwrap();
        let cut = &ct[..EnvelopeHeader::LEN + TAG_LEN - 1];
        assert!(matches!(fast_codec().decrypt(&key, cut), Err(CryptoError::TagMismatch)));
    }

    #[test]
    fn foreign_bytes_are_header_errors() {
        let key = Key::from_password("pw");
        let jpeg = [0xFFu8, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];
        assert!(matches!(fast_codec().decrypt(&key, &jpeg), Err(CryptoError::Header(_))));

        let mut ct = fast_codec().encrypt(&key, b"x").unwrap();
        ct[0] = b'X';
        assert!(matches!(fast_codec().decrypt(&key, &ct), Err(CryptoError::Header(_))));
    }

    #[test]
    fn bad_config_rejected() {
        let err = CryptoCodec::new(CodecConfig { iterations: 0, ..CodecConfig::default() }).unwrap_err();
        assert!(matches!(err, CryptoError::Failure(_)));
    }

    #[test]
    fn key_debug_is_redacted() {
        let dbg = format!("{:?}", Key::from_password("topsecret"));
        assert!(!dbg.contains("topsecret"), "{dbg}");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_roundtrip(pt in proptest::collection::vec(any::<u8>(), 0..4096), pw in "[a-zA-Z0-9]{0,24}") {
            let key = Key::from_password(&pw);
            let ct = fast_codec().encrypt(&key, &pt).unwrap();
            prop_assert_eq!(fast_codec().decrypt(&key, &ct).unwrap(), pt);
        }

        #[test]
        fn prop_single_bit_flip_never_decrypts(pt in proptest::collection::vec(any::<u8>(), 1..256), pos in any::<prop::sample::Index>(), bit in 0u8..8) {
            let key = Key::from_password("pw");
            let mut ct = fast_codec().encrypt(&key, &pt).unwrap();
            let i = pos.index(ct.len());
            ct[i] ^= 1 << bit;
            prop_assert!(fast_codec().decrypt(&key, &ct).is_err());
        }
    }
}
