//! Encoding, comparison and backend-parity laws.

use notekeys::platform::PlatformBackend;
use notekeys::software::SoftwareBackend;
use notekeys::{
    base64, base64_decode, bytes_to_hex_string, first_half_of_key, hex_string_to_bytes,
    second_half_of_key, timing_safe_equal, CryptoPrimitives,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn base64_round_trips_text(text in "\\PC*") {
        prop_assert_eq!(base64_decode(&base64(&text)).unwrap(), text);
    }

    #[test]
    fn hex_round_trips_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let encoded = bytes_to_hex_string(&bytes);
        prop_assert!(encoded.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        prop_assert_eq!(hex_string_to_bytes(&encoded).unwrap(), bytes.clone());
        prop_assert_eq!(hex_string_to_bytes(&encoded.to_uppercase()).unwrap(), bytes);
    }

    #[test]
    fn timing_safe_equal_matches_equality(a in "[a-f0-9]{0,16}", b in "[a-f0-9]{0,16}") {
        prop_assert!(timing_safe_equal(&a, &a));
        prop_assert_eq!(timing_safe_equal(&a, &b), a == b);
    }

    #[test]
    fn halves_concatenate_to_original(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let key = bytes_to_hex_string(&bytes);
        let first = first_half_of_key(&key).unwrap();
        let second = second_half_of_key(&key).unwrap();
        prop_assert_eq!(first.len(), second.len());
        prop_assert_eq!(format!("{}{}", first, second), key);
    }

    #[test]
    fn backends_agree(
        password in "\\PC{1,24}",
        salt in "\\PC{1,24}",
        iterations in 1u32..8,
        message in "\\PC{0,64}",
        key in proptest::collection::vec(any::<u8>(), 0..80),
    ) {
        let platform = PlatformBackend::new();
        let software = SoftwareBackend::new();
        let hex_key = bytes_to_hex_string(&key);

        prop_assert_eq!(
            platform.pbkdf2(&password, &salt, iterations, 768).unwrap(),
            software.pbkdf2(&password, &salt, iterations, 768).unwrap()
        );
        prop_assert_eq!(platform.sha256(&message), software.sha256(&message));
        prop_assert_eq!(
            platform.hmac256(&message, &hex_key).unwrap(),
            software.hmac256(&message, &hex_key).unwrap()
        );
    }
}

#[test]
fn test_timing_safe_equal_scenarios() {
    assert!(!timing_safe_equal("abc", "abd"));
    assert!(!timing_safe_equal("abc", "abcd"));
    assert!(timing_safe_equal("abc", "abc"));
}
