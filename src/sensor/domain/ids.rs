//! Identifier types for the sensor domain.

use super::SensorDomainError;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a sensor record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(Uuid);

impl SensorId {
    /// Creates a new random sensor identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a sensor identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for SensorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-chosen device key, such as `ESP32_A1B2C3D4`.
///
/// Readings reference their sensor by this key. It is fixed once the sensor
/// is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorKey(String);

impl SensorKey {
    /// Prefix of generated keys.
    pub const GENERATED_PREFIX: &'static str = "ESP32_";

    const GENERATED_ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    const GENERATED_SUFFIX_LEN: usize = 8;

    /// Creates a validated, trimmed key.
    ///
    /// # Errors
    ///
    /// Returns [`SensorDomainError::EmptyKey`] when the key is blank.
    pub fn new(key: impl AsRef<str>) -> Result<Self, SensorDomainError> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SensorDomainError::EmptyKey);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generates a random key from the thread-local generator.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Generates a key: the `ESP32_` prefix and eight upper-case letters or
    /// digits drawn from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: String = (0..Self::GENERATED_SUFFIX_LEN)
            .filter_map(|_| Self::GENERATED_ALPHABET.choose(&mut *rng).copied().map(char::from))
            .collect();
        Self(format!("{}{suffix}", Self::GENERATED_PREFIX))
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
