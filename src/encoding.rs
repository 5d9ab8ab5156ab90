//! Text and binary encodings shared by both backends.
//!
//! Hex output is always lowercase; hex input is accepted in either case.
//! Base64 is the standard alphabet with padding. Decoders reject malformed
//! input outright and never return partial data.

use ::base64::engine::general_purpose::STANDARD;
use ::base64::Engine;

use crate::error::{KeyDerivationError, Result};

/// Base64-encode the UTF-8 bytes of `text`.
pub fn base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode base64 back into UTF-8 text.
pub fn base64_decode(encoded: &str) -> Result<String> {
    let bytes = base64_to_bytes(encoded)?;
    String::from_utf8(bytes)
        .map_err(|_| KeyDerivationError::DecodeError("decoded base64 is not utf-8".to_string()))
}

/// Decode base64 into raw bytes.
pub fn base64_to_bytes(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| KeyDerivationError::DecodeError(format!("base64: {}", e)))
}

/// Parse a hex string into bytes. Case-insensitive.
pub fn hex_string_to_bytes(hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| KeyDerivationError::DecodeError(format!("hex: {}", e)))
}

/// Render bytes as lowercase hex.
pub fn bytes_to_hex_string(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
