use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::settings::SettingsHandle;
use crate::services::{
    resolver::SettingsResolver, settings_store::SettingsStore, storage::S3Storage,
    uploader::Uploader,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsHandle,
    pub store: Arc<dyn SettingsStore>,
    pub storage: Arc<S3Storage>,
    pub resolver: Arc<SettingsResolver>,
    pub uploader: Arc<Uploader>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn SettingsStore>) -> Self {
        let config = Arc::new(config);
        let settings = SettingsHandle::default();
        let storage = Arc::new(S3Storage::new(settings.clone()));
        let resolver = Arc::new(SettingsResolver::new(
            store.clone(),
            config.clone(),
            settings.clone(),
            storage.clone(),
        ));
        let uploader = Arc::new(Uploader::new(config, settings.clone(), storage.clone()));

        Self {
            settings,
            store,
            storage,
            resolver,
            uploader,
        }
    }
}
