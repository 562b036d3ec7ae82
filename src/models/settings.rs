use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Resolved storage settings. Immutable once built; the resolver swaps in a
/// whole new snapshot rather than mutating fields in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Credential pair, sourced only from the persisted store.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,

    pub bucket: String,
    pub host: String,
    pub path: String,
    pub region: String,

    /// True when both credential fields were persisted non-empty. Drives the
    /// admin view's show-stored-secret behavior.
    pub credentials_from_store: bool,
}

impl Settings {
    /// Both credential halves, when the stored pair is complete.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.access_key_id.as_deref(), self.secret_access_key.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id, secret))
            }
            _ => None,
        }
    }
}

/// Shared handle to the active settings snapshot. Reads clone out the `Arc`
/// so the lock is never held across an await point.
#[derive(Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Arc<Settings>>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    pub fn current(&self) -> Arc<Settings> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn replace(&self, settings: Settings) {
        let mut slot = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Arc::new(settings);
    }
}

/// Admin save body for bucket/host/path/region. Omitted fields persist as
/// empty strings (clear on omit).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSettingsForm {
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Admin save body for the credential pair, same clear-on-omit semantics.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsForm {
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

/// Admin view of the active settings. Credentials appear only when they came
/// from the persisted store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub bucket: String,
    pub host: String,
    pub path: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl From<&Settings> for SettingsView {
    fn from(settings: &Settings) -> Self {
        let (access_key_id, secret_access_key) = if settings.credentials_from_store {
            (
                settings.access_key_id.clone().unwrap_or_default(),
                settings.secret_access_key.clone().unwrap_or_default(),
            )
        } else {
            (String::new(), String::new())
        };

        Self {
            bucket: settings.bucket.clone(),
            host: settings.host.clone(),
            path: settings.path.clone(),
            region: settings.region.clone(),
            access_key_id,
            secret_access_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_halves() {
        let mut settings = Settings::default();
        assert!(settings.credentials().is_none());

        settings.access_key_id = Some("AKIA123".to_string());
        assert!(settings.credentials().is_none());

        settings.secret_access_key = Some("secret".to_string());
        assert_eq!(settings.credentials(), Some(("AKIA123", "secret")));
    }

    #[test]
    fn handle_swaps_whole_snapshots() {
        let handle = SettingsHandle::new(Settings {
            bucket: "old".to_string(),
            ..Settings::default()
        });
        let before = handle.current();

        handle.replace(Settings {
            bucket: "new".to_string(),
            ..Settings::default()
        });

        assert_eq!(before.bucket, "old");
        assert_eq!(handle.current().bucket, "new");
    }

    #[test]
    fn view_serializes_with_camel_case_fields() {
        let view = SettingsView::from(&Settings {
            bucket: "mybucket".to_string(),
            ..Settings::default()
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["bucket"], "mybucket");
        assert_eq!(json["accessKeyId"], "");
        assert!(json.get("access_key_id").is_none());
    }

    #[test]
    fn view_hides_credentials_not_from_store() {
        let settings = Settings {
            access_key_id: Some("AKIA123".to_string()),
            secret_access_key: Some("secret".to_string()),
            credentials_from_store: false,
            ..Settings::default()
        };
        let view = SettingsView::from(&settings);
        assert!(view.access_key_id.is_empty());
        assert!(view.secret_access_key.is_empty());

        let view = SettingsView::from(&Settings {
            credentials_from_store: true,
            ..settings
        });
        assert_eq!(view.access_key_id, "AKIA123");
        assert_eq!(view.secret_access_key, "secret");
    }
}
