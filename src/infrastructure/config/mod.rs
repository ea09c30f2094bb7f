use crate::domain::error::{AppError, Result};
use crate::infrastructure::security::keyring::KeyringManager;
use crate::infrastructure::storage::{CredentialBackend, FileBackend, MemoryBackend};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_CONFIG_FILE: &str = "casegen.toml";
pub const ENV_PREFIX: &str = "CASEGEN_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackendKind {
    Keyring,
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(url)]
    pub api_base_url: String,
    #[validate(length(min = 1))]
    pub default_domain: String,
    pub credential_backend: CredentialBackendKind,
    pub data_dir: PathBuf,
    #[validate(length(min = 1))]
    pub keyring_service: String,
    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            default_domain: "Healthcare".to_string(),
            credential_backend: CredentialBackendKind::File,
            data_dir: PathBuf::from(".casegen"),
            keyring_service: "casegen".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    /// Defaults, then the TOML file (if present), then `CASEGEN_*` variables.
    pub fn new(config_file: Option<&Path>) -> Self {
        let _ = dotenvy::dotenv();
        let file = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self {
            figment: Figment::from(Serialized::defaults(AppConfig::default()))
                .merge(Toml::file(file))
                .merge(Env::prefixed(ENV_PREFIX)),
        }
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = self
            .figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;
        Ok(config)
    }
}

pub fn open_credential_backend(config: &AppConfig) -> Arc<dyn CredentialBackend + Send + Sync> {
    match config.credential_backend {
        CredentialBackendKind::Keyring => Arc::new(KeyringManager::new(&config.keyring_service)),
        CredentialBackendKind::File => Arc::new(FileBackend::new(config.data_dir.join("credentials"))),
        CredentialBackendKind::Memory => Arc::new(MemoryBackend::new()),
    }
}
