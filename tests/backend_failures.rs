//! Backend failures propagate to the caller unchanged.

use std::sync::Arc;

use notekeys::{
    CryptoPrimitives, DerivationParameters, KdfConfig, KeyDerivationError, KeyDerivationService,
    Result,
};

/// A backend whose random source is gone and whose KDF refuses to run.
struct BrokenBackend;

impl CryptoPrimitives for BrokenBackend {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn pbkdf2(&self, _: &str, _: &str, _: u32, _: u32) -> Result<String> {
        Err(KeyDerivationError::PrimitiveFailure("kdf offline".to_string()))
    }

    fn sha256(&self, _: &str) -> String {
        String::new()
    }

    fn hmac256(&self, _: &str, _: &str) -> Result<String> {
        Err(KeyDerivationError::PrimitiveFailure("mac offline".to_string()))
    }

    fn secure_random_bytes(&self, _: usize) -> Result<Vec<u8>> {
        Err(KeyDerivationError::EntropyUnavailable)
    }
}

/// Returns a truncated PBKDF2 output.
struct ShortBackend;

impl CryptoPrimitives for ShortBackend {
    fn name(&self) -> &'static str {
        "short"
    }

    fn pbkdf2(&self, _: &str, _: &str, _: u32, _: u32) -> Result<String> {
        Ok("00112233".to_string())
    }

    fn sha256(&self, _: &str) -> String {
        String::new()
    }

    fn hmac256(&self, _: &str, _: &str) -> Result<String> {
        Ok(String::new())
    }

    fn secure_random_bytes(&self, n: usize) -> Result<Vec<u8>> {
        Ok(vec![7u8; n])
    }
}

fn service_with(backend: Arc<dyn CryptoPrimitives>) -> KeyDerivationService {
    KeyDerivationService::with_backend(KdfConfig::default(), backend).unwrap()
}

#[test]
fn test_entropy_failure_is_fatal() {
    let service = service_with(Arc::new(BrokenBackend));
    assert_eq!(service.backend_name(), "broken");
    assert_eq!(
        service.generate_random_key(256).unwrap_err(),
        KeyDerivationError::EntropyUnavailable
    );
    assert_eq!(
        service.generate_item_encryption_key().unwrap_err(),
        KeyDerivationError::EntropyUnavailable
    );
}

#[test]
fn test_primitive_failure_surfaces() {
    let service = service_with(Arc::new(BrokenBackend));
    let params = DerivationParameters::new("pw", "salt", 1).unwrap();
    assert!(matches!(
        service.generate_symmetric_key_pair(&params),
        Err(KeyDerivationError::PrimitiveFailure(_))
    ));
    assert!(matches!(
        service.hmac256("msg", "00"),
        Err(KeyDerivationError::PrimitiveFailure(_))
    ));
}

#[test]
fn test_short_item_key_rejected() {
    let service = service_with(Arc::new(ShortBackend));
    assert!(matches!(
        service.generate_item_encryption_key(),
        Err(KeyDerivationError::PrimitiveFailure(_))
    ));
}

#[test]
fn test_service_is_shareable_across_threads() {
    let service = KeyDerivationService::new(KdfConfig::default()).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            std::thread::spawn(move || service.generate_random_key(256).unwrap())
        })
        .collect();

    let keys: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(keys.len(), 4);
    assert_ne!(keys[0], keys[1]);
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notekeys.json");
    std::fs::write(&path, r#"{"pbkdf2_length_bits": 1536, "backend": "platform"}"#).unwrap();

    let config = KdfConfig::from_json_file(&path).unwrap();
    let service = KeyDerivationService::new(config).unwrap();
    assert_eq!(service.backend_name(), "platform");

    let params = DerivationParameters::new("pw", "salt", 1).unwrap();
    let keys = service.generate_symmetric_key_pair(&params).unwrap();
    assert_eq!(keys.encryption_key.len(), 128);
}
