//! Sensor aggregate and related value types.

use super::{ParseSensorStatusError, SensorDomainError, SensorId, SensorKey};
use crate::session::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a sensor is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    /// Reporting readings.
    #[default]
    Active,
    /// Switched off or retired.
    Inactive,
}

impl SensorStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SensorStatus {
    type Error = ParseSensorStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseSensorStatusError(value.to_owned())),
        }
    }
}

/// Validated user input for registering or editing a sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDraft {
    key: SensorKey,
    name: String,
    description: Option<String>,
    status: SensorStatus,
}

impl SensorDraft {
    /// Creates an active sensor draft.
    ///
    /// # Errors
    ///
    /// Returns [`SensorDomainError::EmptyKey`] or
    /// [`SensorDomainError::EmptyName`] for blank input.
    pub fn new(key: impl AsRef<str>, name: impl AsRef<str>) -> Result<Self, SensorDomainError> {
        let key = SensorKey::new(key)?;
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(SensorDomainError::EmptyName);
        }
        Ok(Self {
            key,
            name: name.to_owned(),
            description: None,
            status: SensorStatus::default(),
        })
    }

    /// Sets the description; blank text clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        let trimmed = description.as_ref().trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: SensorStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &SensorKey {
        &self.key
    }
}

/// Sensor aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    id: SensorId,
    owner: UserId,
    key: SensorKey,
    name: String,
    description: Option<String>,
    status: SensorStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSensorData {
    /// Persisted identifier.
    pub id: SensorId,
    /// Owning user.
    pub owner: UserId,
    /// Device key.
    pub key: SensorKey,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Reporting status.
    pub status: SensorStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Sensor {
    /// Registers a sensor owned by `owner`.
    #[must_use]
    pub fn create(owner: UserId, draft: SensorDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SensorId::new(),
            owner,
            key: draft.key,
            name: draft.name,
            description: draft.description,
            status: draft.status,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a sensor from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSensorData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            key: data.key,
            name: data.name,
            description: data.description,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Replaces name, description and status.
    ///
    /// # Errors
    ///
    /// Returns [`SensorDomainError::KeyChanged`] when `draft` carries a
    /// different key; the sensor is left untouched.
    pub fn apply(
        &mut self,
        draft: SensorDraft,
        clock: &impl Clock,
    ) -> Result<(), SensorDomainError> {
        if draft.key != self.key {
            return Err(SensorDomainError::KeyChanged {
                current: self.key.to_string(),
                requested: draft.key.to_string(),
            });
        }
        self.name = draft.name;
        self.description = draft.description;
        self.status = draft.status;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Returns `true` when `term` occurs in the name, key, or description,
    /// ignoring case. An empty term matches every sensor.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.key.as_str().to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
    }

    /// Returns the sensor identifier.
    #[must_use]
    pub const fn id(&self) -> SensorId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the device key.
    #[must_use]
    pub const fn key(&self) -> &SensorKey {
        &self.key
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the reporting status.
    #[must_use]
    pub const fn status(&self) -> SensorStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
