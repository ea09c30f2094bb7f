use crate::domain::credentials::PlatformCredentials;
use crate::domain::error::{AppError, Result};
use crate::domain::platform::Platform;
use crate::infrastructure::storage::CredentialBackend;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// In-memory credential records backed by a persistent store.
///
/// Edits stay in memory until [`CredentialStore::save`]; [`CredentialStore::discard`]
/// drops them by reloading from the backend.
pub struct CredentialStore {
    backend: Arc<dyn CredentialBackend + Send + Sync>,
    records: Mutex<HashMap<Platform, PlatformCredentials>>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn CredentialBackend + Send + Sync>) -> Self {
        let records = Platform::ALL
            .iter()
            .map(|platform| (*platform, PlatformCredentials::empty_for(*platform)))
            .collect();
        Self {
            backend,
            records: Mutex::new(records),
        }
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<Platform, PlatformCredentials>>> {
        self.records
            .lock()
            .map_err(|_| AppError::Internal("Credential records lock poisoned".to_string()))
    }

    /// Reads every platform's record; a missing or unreadable record becomes empty.
    pub fn load(&self) -> Result<()> {
        let mut loaded = HashMap::new();
        for platform in Platform::ALL {
            loaded.insert(platform, self.read_record(platform));
        }
        *self.records()? = loaded;
        debug!("Credential records loaded");
        Ok(())
    }

    fn read_record(&self, platform: Platform) -> PlatformCredentials {
        let raw = match self.backend.read(platform.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PlatformCredentials::empty_for(platform),
            Err(e) => {
                warn!(platform = %platform, error = %e, "Failed to read credentials, using empty record");
                return PlatformCredentials::empty_for(platform);
            }
        };

        match serde_json::from_str::<PlatformCredentials>(&raw) {
            Ok(record) => record.normalized_for(platform),
            Err(e) => {
                warn!(platform = %platform, error = %e, "Stored credentials are malformed, using empty record");
                PlatformCredentials::empty_for(platform)
            }
        }
    }

    /// Changes one field in memory only.
    pub fn update(&self, platform: Platform, field: &str, value: &str) -> Result<()> {
        if !platform.required_fields().contains(&field) {
            return Err(AppError::ValidationError(format!(
                "Unknown {} field '{}'. Expected one of: {}",
                platform.display_name(),
                field,
                platform.required_fields().join(", ")
            )));
        }
        let mut records = self.records()?;
        records
            .entry(platform)
            .or_insert_with(|| PlatformCredentials::empty_for(platform))
            .set(field, value);
        Ok(())
    }

    pub fn get(&self, platform: Platform) -> Result<PlatformCredentials> {
        Ok(self
            .records()?
            .get(&platform)
            .cloned()
            .unwrap_or_else(|| PlatformCredentials::empty_for(platform)))
    }

    /// Recomputed from the current in-memory record on every call.
    pub fn is_valid(&self, platform: Platform) -> bool {
        self.get(platform)
            .map(|record| record.is_valid_for(platform))
            .unwrap_or(false)
    }

    /// Writes every record, one backend key per platform.
    pub fn save(&self) -> Result<()> {
        let snapshot: Vec<(Platform, PlatformCredentials)> = {
            let records = self.records()?;
            Platform::ALL
                .iter()
                .map(|platform| {
                    let record = records
                        .get(platform)
                        .cloned()
                        .unwrap_or_else(|| PlatformCredentials::empty_for(*platform));
                    (*platform, record)
                })
                .collect()
        };

        for (platform, record) in snapshot {
            let serialized = serde_json::to_string(&record)?;
            self.backend.write(platform.key(), &serialized)?;
        }
        info!("Credential records saved");
        Ok(())
    }

    /// Drops unsaved edits by reloading from the backend.
    pub fn discard(&self) -> Result<()> {
        self.load()
    }
}
