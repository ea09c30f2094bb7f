use crate::domain::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat `field -> value` record for one platform.
///
/// Serializes as a plain JSON object, both in storage and in the `credentials`
/// member of an integration payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformCredentials {
    fields: BTreeMap<String, String>,
}

impl PlatformCredentials {
    /// Record with every required field present and empty, plus platform defaults.
    pub fn empty_for(platform: Platform) -> Self {
        let mut fields: BTreeMap<String, String> = platform
            .required_fields()
            .iter()
            .map(|field| (field.to_string(), String::new()))
            .collect();
        for (field, value) in platform.field_defaults() {
            fields.insert(field.to_string(), value.to_string());
        }
        Self { fields }
    }

    /// Fills in required fields a persisted record lacks.
    pub fn normalized_for(mut self, platform: Platform) -> Self {
        for field in platform.required_fields() {
            self.fields.entry(field.to_string()).or_default();
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Valid iff every required field is non-empty after trimming.
    pub fn is_valid_for(&self, platform: Platform) -> bool {
        self.missing_fields(platform).is_empty()
    }

    pub fn missing_fields(&self, platform: Platform) -> Vec<&'static str> {
        platform
            .required_fields()
            .iter()
            .copied()
            .filter(|field| {
                self.fields
                    .get(*field)
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Copy with secret fields replaced by a fixed mask, for display.
    pub fn masked(&self, platform: Platform) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(field, value)| {
                let shown = if platform.secret_fields().contains(&field.as_str())
                    && !value.is_empty()
                {
                    "********".to_string()
                } else {
                    value.clone()
                };
                (field.clone(), shown)
            })
            .collect()
    }
}
