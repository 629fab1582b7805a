//! Integration tests for the key-management boundary

use std::sync::Arc;

use claims_core::key_management::{
    EncryptionAlgorithm, EncryptionAlgorithmLocator, GetKeyRequest, KeyManagementMode,
    KeyManagementModes, KeyRequest, Named, Recipient, SecretKey,
};
use claims_core::{ClaimMap, KeyManagementError};
use test_utils::TestClaimsBuilder;

#[derive(Debug)]
struct ContentAlgorithm {
    name: &'static str,
}

impl Named for ContentAlgorithm {
    fn name(&self) -> &str {
        self.name
    }
}

impl EncryptionAlgorithm for ContentAlgorithm {}

fn a256gcm() -> Arc<dyn EncryptionAlgorithm> {
    Arc::new(ContentAlgorithm { name: "A256GCM" })
}

/// Only hands out keys whose length matches the requested algorithm
#[derive(Debug)]
struct LengthCheckedMode {
    key: SecretKey,
    expected_bits: usize,
}

impl KeyManagementMode for LengthCheckedMode {
    fn get_key(&self, request: &dyn GetKeyRequest) -> Result<SecretKey, KeyManagementError> {
        if self.key.bit_length() == self.expected_bits {
            Ok(self.key.clone())
        } else {
            Err(KeyManagementError::KeyUnavailable {
                algorithm: request.encryption_algorithm().name().to_string(),
            })
        }
    }
}

struct HeaderLocator;

impl EncryptionAlgorithmLocator for HeaderLocator {
    fn locate(&self, header: &ClaimMap) -> Option<Arc<dyn EncryptionAlgorithm>> {
        match header.get("enc").and_then(|v| v.as_str()) {
            Some("A256GCM") => Some(a256gcm()),
            _ => None,
        }
    }
}

mod direct_mode {
    use super::*;

    #[test]
    fn test_direct_mode_returns_supplied_key() {
        let key = SecretKey::new("A256GCM", vec![7u8; 32]);
        let mode = KeyManagementModes::direct(key.clone());

        let resolved = mode.get_key(&KeyRequest::new(a256gcm())).unwrap();

        assert_eq!(resolved, key);
        assert_eq!(resolved.bit_length(), 256);
        assert_eq!(resolved.algorithm(), "A256GCM");
    }

    #[test]
    fn test_secret_key_debug_is_redacted() {
        let key = SecretKey::new("A128GCM", vec![0xAB; 16]);
        let rendered = format!("{key:?}");

        assert!(rendered.contains("bits: 128"));
        assert!(!rendered.contains("171"));
    }
}

mod custom_mode {
    use super::*;

    #[test]
    fn test_mode_can_inspect_algorithm() {
        let mode = LengthCheckedMode {
            key: SecretKey::new("A128GCM", vec![1u8; 16]),
            expected_bits: 256,
        };

        let error = mode.get_key(&KeyRequest::new(a256gcm())).unwrap_err();

        assert_eq!(error.to_string(), "No key available for encryption algorithm A256GCM");
    }

    #[test]
    fn test_locator_reads_header_claims() {
        let header = TestClaimsBuilder::new()
            .without_issued_at()
            .with_claim("enc", "A256GCM")
            .build();
        let recipient = Recipient::new(header);

        let algorithm = HeaderLocator.locate(recipient.header()).unwrap();

        assert_eq!(algorithm.name(), "A256GCM");
        assert!(HeaderLocator.locate(&ClaimMap::new()).is_none());
    }

    #[test]
    fn test_recipient_header_is_mutable() {
        let mut recipient = Recipient::default();
        recipient.header_mut().put("kid", "key-1");

        assert_eq!(recipient.header().get_string("kid").as_deref(), Some("key-1"));
    }
}
