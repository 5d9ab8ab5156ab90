//! Key material, derivation inputs, and key splitting.
//!
//! Owns three responsibilities:
//! 1. Holding encoded key material in a type that is validated on
//!    construction, redacted in `Debug`, compared in constant time, and
//!    zeroised on drop.
//! 2. Carrying the inputs of a passphrase derivation.
//! 3. Partitioning one derived output into contiguous sub-keys.
//!
//! ## Partitioning
//!
//! ```text
//! derived:  [ slice 0 ][ slice 1 ][ slice 2 ][ rem ]
//!            total/n    total/n    total/n    dropped
//! ```
//!
//! Slice sizes are computed on bytes, so every slice is itself whole-byte
//! hex. Remainder bytes at the tail are discarded, never folded into the
//! last slice. Changing that would change every key derived so far.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::compare::timing_safe_equal;
use crate::error::{KeyDerivationError, Result};

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// Key bytes encoded as lowercase hex.
///
/// - Always an even number of characters from `[0-9a-f]`.
/// - Zeroised on drop.
/// - `==` runs in constant time for equal-length values.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    hex: String,
}

impl KeyMaterial {
    /// Validate and normalise a hex string. Upper-case digits are accepted
    /// and stored lowercase.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() % 2 != 0 {
            return Err(KeyDerivationError::DecodeError(
                "key material must be a whole number of bytes".to_string(),
            ));
        }
        if !hex_str.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(KeyDerivationError::DecodeError(
                "key material must be hex".to_string(),
            ));
        }
        Ok(Self {
            hex: hex_str.to_ascii_lowercase(),
        })
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            hex: hex::encode(bytes),
        }
    }

    /// The hex text.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Decode back to raw bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::encoding::hex_string_to_bytes(&self.hex)
    }

    /// Length in hex characters.
    pub fn len(&self) -> usize {
        self.hex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hex.is_empty()
    }

    /// Length in bytes.
    pub fn byte_len(&self) -> usize {
        self.hex.len() / 2
    }

    /// Hex characters `[start, end)` as a new value. Both bounds are byte
    /// offsets into the decoded key.
    fn byte_range(&self, start: usize, end: usize) -> Self {
        Self {
            hex: self.hex[start * 2..end * 2].to_string(),
        }
    }
}

impl PartialEq for KeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        timing_safe_equal(&self.hex, &other.hex)
    }
}

impl Eq for KeyMaterial {}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("hex", &"[REDACTED]")
            .field("bytes", &self.byte_len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Derivation inputs
// ---------------------------------------------------------------------------

/// Inputs of a passphrase derivation.
///
/// Password and salt are opaque strings, UTF-8 encoded before hashing.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivationParameters {
    password: String,
    salt: String,
    #[zeroize(skip)]
    iterations: u32,
}

impl DerivationParameters {
    /// Rejects an empty password, an empty salt, or a zero iteration count.
    pub fn new(password: impl Into<String>, salt: impl Into<String>, iterations: u32) -> Result<Self> {
        let params = Self {
            password: password.into(),
            salt: salt.into(),
            iterations,
        };

        if params.password.is_empty() {
            return Err(KeyDerivationError::InvalidParameter(
                "password cannot be empty".to_string(),
            ));
        }
        if params.salt.is_empty() {
            return Err(KeyDerivationError::InvalidParameter(
                "salt cannot be empty".to_string(),
            ));
        }
        if params.iterations < 1 {
            return Err(KeyDerivationError::InvalidParameter(
                "iterations must be at least 1".to_string(),
            ));
        }

        Ok(params)
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl fmt::Debug for DerivationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationParameters")
            .field("password", &"[REDACTED]")
            .field("salt", &self.salt)
            .field("iterations", &self.iterations)
            .finish()
    }
}

/// The server-stored half of the derivation inputs, as it travels in
/// account metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParams {
    pub pw_salt: String,
    pub pw_cost: u32,
}

impl KeyParams {
    /// Combine with the user's passphrase.
    pub fn with_password(&self, password: impl Into<String>) -> Result<DerivationParameters> {
        DerivationParameters::new(password, self.pw_salt.clone(), self.pw_cost)
    }
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Disjoint, contiguous, equal-sized slices of one derived output, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedKeySet {
    slices: Vec<KeyMaterial>,
}

impl DerivedKeySet {
    /// Split `derived` into `parts` slices of `byte_len / parts` bytes each.
    pub fn partition(derived: &KeyMaterial, parts: usize) -> Result<Self> {
        if parts == 0 {
            return Err(KeyDerivationError::InvalidParameter(
                "cannot split into zero parts".to_string(),
            ));
        }
        let slice_len = derived.byte_len() / parts;
        if slice_len == 0 {
            return Err(KeyDerivationError::InvalidParameter(format!(
                "{} byte key cannot be split into {} parts",
                derived.byte_len(),
                parts
            )));
        }

        let slices = (0..parts)
            .map(|i| derived.byte_range(i * slice_len, (i + 1) * slice_len))
            .collect();

        Ok(Self { slices })
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeyMaterial> {
        self.slices.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyMaterial> {
        self.slices.iter()
    }

    pub fn into_vec(self) -> Vec<KeyMaterial> {
        self.slices
    }
}

/// The three keys derived from a passphrase.
///
/// Field order matches slice order in the derived output. Reordering breaks
/// every existing account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricKeys {
    /// Slice 0.
    pub encryption_key: KeyMaterial,
    /// Slice 1.
    pub authentication_key: KeyMaterial,
    /// Slice 2.
    pub master_key_verifier: KeyMaterial,
}

impl SymmetricKeys {
    pub(crate) fn from_key_set(set: DerivedKeySet) -> Result<Self> {
        let mut slices = set.into_vec().into_iter();
        match (slices.next(), slices.next(), slices.next(), slices.next()) {
            (Some(encryption_key), Some(authentication_key), Some(master_key_verifier), None) => {
                Ok(Self {
                    encryption_key,
                    authentication_key,
                    master_key_verifier,
                })
            }
            _ => Err(KeyDerivationError::InvalidParameter(
                "symmetric key set needs exactly three slices".to_string(),
            )),
        }
    }

    /// The keys as an ordered tuple.
    pub fn into_tuple(self) -> (KeyMaterial, KeyMaterial, KeyMaterial) {
        (
            self.encryption_key,
            self.authentication_key,
            self.master_key_verifier,
        )
    }
}

/// Characters `[0, len/2)` of `key`.
pub fn first_half_of_key(key: &str) -> Result<String> {
    let mid = half_split_point(key)?;
    Ok(key[..mid].to_string())
}

/// Characters `[len/2, len)` of `key`.
pub fn second_half_of_key(key: &str) -> Result<String> {
    let mid = half_split_point(key)?;
    Ok(key[mid..].to_string())
}

/// Encoded keys are ASCII and even-length. Anything else would split into
/// unequal or mid-character halves.
fn half_split_point(key: &str) -> Result<usize> {
    if !key.is_ascii() {
        return Err(KeyDerivationError::InvalidParameter(
            "key must be ascii text".to_string(),
        ));
    }
    if key.len() % 2 != 0 {
        return Err(KeyDerivationError::InvalidParameter(
            "cannot halve an odd-length key".to_string(),
        ));
    }
    Ok(key.len() / 2)
}
