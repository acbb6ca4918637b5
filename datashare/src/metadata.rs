//! Versioned metadata attached to a data submission.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};

/// Structured metadata for a vehicle event.
///
/// Parsed from JSON with unknown fields rejected, and validated once at
/// submission so consumers never re-parse free-form strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DataMetadata {
    pub version: u32,
    /// e.g. `"Pothole"`, `"Fog"`.
    pub event_type: String,
    pub vehicle_id: String,
}

impl DataMetadata {
    pub const SCHEMA_VERSION: u32 = 1;
    /// Vehicle ids are stored upstream as a null-terminated `bytes32`.
    pub const MAX_VEHICLE_ID_LEN: usize = 31;
    pub const MAX_EVENT_TYPE_LEN: usize = 64;

    pub fn new(event_type: impl Into<String>, vehicle_id: impl Into<String>) -> Self {
        Self {
            version: Self::SCHEMA_VERSION,
            event_type: event_type.into(),
            vehicle_id: vehicle_id.into(),
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let metadata: Self = serde_json::from_str(json)
            .map_err(|e| RegistryError::InvalidMetadata(e.to_string()))?;
        metadata.validate()?;
        Ok(metadata)
    }

    pub fn to_json(&self) -> String {
        // A struct of plain strings and integers always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.version != Self::SCHEMA_VERSION {
            return Err(RegistryError::InvalidMetadata(format!(
                "unsupported version {}, expected {}",
                self.version,
                Self::SCHEMA_VERSION
            )));
        }
        check_field("eventType", &self.event_type, Self::MAX_EVENT_TYPE_LEN)?;
        check_field("vehicleId", &self.vehicle_id, Self::MAX_VEHICLE_ID_LEN)?;
        Ok(())
    }
}

fn check_field(name: &str, value: &str, max_len: usize) -> Result<(), RegistryError> {
    if value.trim().is_empty() {
        return Err(RegistryError::InvalidMetadata(format!("{name} is empty")));
    }
    if value.len() > max_len {
        return Err(RegistryError::InvalidMetadata(format!(
            "{name} is {} bytes, limit {max_len}",
            value.len()
        )));
    }
    Ok(())
}
