use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use crate::config::AppConfig;
use crate::models::settings::{Settings, SettingsHandle};
use crate::services::settings_store::{SettingsStore, StoreError, SETTINGS_NAMESPACE};
use crate::services::storage::S3Storage;

/// The fixed field set read from the persisted store.
pub const SETTINGS_FIELDS: &[&str] = &[
    "accessKeyId",
    "secretAccessKey",
    "bucket",
    "host",
    "path",
    "region",
];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to fetch settings: {0}")]
    Fetch(#[from] StoreError),
}

/// Merges persisted settings with environment defaults into one immutable
/// snapshot and swaps it into the shared handle. The storage client memo is
/// invalidated on every successful refresh so the next write is signed with
/// the fresh credentials and region.
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
    config: Arc<AppConfig>,
    settings: SettingsHandle,
    storage: Arc<S3Storage>,
}

impl SettingsResolver {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        config: Arc<AppConfig>,
        settings: SettingsHandle,
        storage: Arc<S3Storage>,
    ) -> Self {
        Self {
            store,
            config,
            settings,
            storage,
        }
    }

    /// Fetch, resolve, and activate the settings. On a store read failure
    /// the prior snapshot stays untouched; the error is logged here and
    /// returned so startup can fail fast while a post-save refresh may
    /// ignore it.
    pub async fn refresh(&self) -> Result<(), SettingsError> {
        let persisted = self
            .store
            .get_fields(SETTINGS_NAMESPACE, SETTINGS_FIELDS)
            .await
            .map_err(|err| {
                let err = SettingsError::Fetch(err);
                error!("{} :: {err}", env!("CARGO_PKG_NAME"));
                err
            })?;

        self.settings.replace(resolve(&persisted, &self.config));
        self.storage.invalidate();
        Ok(())
    }
}

/// Per-field precedence: a persisted value wins, including an explicitly
/// persisted empty string; only a field absent from the store falls back to
/// the environment default, and failing that to empty. Credentials come
/// solely from the store.
fn resolve(persisted: &HashMap<String, String>, config: &AppConfig) -> Settings {
    let non_empty = |field: &str| {
        persisted
            .get(field)
            .filter(|value| !value.is_empty())
            .cloned()
    };
    let with_env_default = |field: &str, default: &str| {
        persisted
            .get(field)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };

    let access_key_id = non_empty("accessKeyId");
    let secret_access_key = non_empty("secretAccessKey");
    let credentials_from_store = access_key_id.is_some() && secret_access_key.is_some();

    Settings {
        access_key_id,
        secret_access_key,
        bucket: with_env_default("bucket", config.bucket_default()),
        host: with_env_default("host", config.host_default()),
        path: with_env_default("path", config.path_default()),
        region: with_env_default("region", config.region_default()),
        credentials_from_store,
    }
}
