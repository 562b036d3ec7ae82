use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Namespace under which all settings fields are persisted. Stable across
/// releases; renaming it would orphan previously saved settings.
pub const SETTINGS_NAMESPACE: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, thiserror::Error)]
#[error("settings store unavailable: {0}")]
pub struct StoreError(pub String);

/// Key-value settings persistence owned by the host application. Fields that
/// were never saved are simply absent from the returned map; callers treat
/// absence (not emptiness) as the fallback trigger.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_fields(
        &self,
        namespace: &str,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, StoreError>;

    async fn set_fields(
        &self,
        namespace: &str,
        values: HashMap<String, String>,
    ) -> Result<(), StoreError>;
}

/// Process-local store backing the standalone binary and the test suite.
#[derive(Default)]
pub struct MemorySettingsStore {
    objects: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_fields(
        &self,
        namespace: &str,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, StoreError> {
        let objects = self.objects.read().await;
        let mut out = HashMap::new();
        if let Some(object) = objects.get(namespace) {
            for field in fields {
                if let Some(value) = object.get(*field) {
                    out.insert((*field).to_string(), value.clone());
                }
            }
        }
        Ok(out)
    }

    async fn set_fields(
        &self,
        namespace: &str,
        values: HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        objects.entry(namespace.to_string()).or_default().extend(values);
        Ok(())
    }
}
