use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use crate::models::settings::SettingsHandle;

/// The write seam the upload orchestrator talks through. Lets tests swap in
/// a recording store without touching the network.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Persist a fully-buffered body under `key`. The backend contract
    /// requires a known content length, hence `&[u8]` rather than a stream.
    async fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError>;
}

/// S3 client wrapper. The underlying bucket handle is built lazily on first
/// write from the active settings snapshot and memoized; `invalidate` clears
/// the memo so the next write picks up refreshed credentials or region.
/// Construction performs no network calls.
pub struct S3Storage {
    settings: SettingsHandle,
    client: Mutex<Option<Box<Bucket>>>,
}

impl S3Storage {
    pub fn new(settings: SettingsHandle) -> Self {
        Self {
            settings,
            client: Mutex::new(None),
        }
    }

    /// Drop the memoized bucket handle. Called on shutdown and after every
    /// settings refresh.
    pub fn invalidate(&self) {
        let mut client = self
            .client
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *client = None;
    }

    fn bucket(&self) -> Result<Box<Bucket>, StorageError> {
        let mut client = self
            .client
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Bucket is cheap to clone; the clone escapes the lock so the put
        // itself runs unguarded.
        match client.as_ref() {
            Some(bucket) => Ok(bucket.clone()),
            None => {
                let bucket = self.build_bucket()?;
                *client = Some(bucket.clone());
                Ok(bucket)
            }
        }
    }

    fn build_bucket(&self) -> Result<Box<Bucket>, StorageError> {
        let settings = self.settings.current();

        let region = if settings.region.is_empty() {
            Region::UsEast1
        } else {
            Region::from_str(&settings.region)
                .map_err(|e| StorageError::Config(e.to_string()))?
        };

        // Request signing is AWS Signature V4, fixed by the client.
        let credentials = match settings.credentials() {
            Some((access_key_id, secret_access_key)) => Credentials::new(
                Some(access_key_id),
                Some(secret_access_key),
                None,
                None,
                None,
            ),
            None => Credentials::default(),
        }
        .map_err(|e| StorageError::Config(e.to_string()))?;

        Bucket::new(&settings.bucket, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError> {
        let bucket = self.bucket()?;
        bucket
            .put_object_with_content_type(key, body, content_type)
            .await
            .map_err(StorageError::S3)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 write failed: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("storage configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Settings;

    fn handle_with(settings: Settings) -> SettingsHandle {
        SettingsHandle::new(settings)
    }

    #[test]
    fn builds_bucket_from_stored_credentials() {
        let storage = S3Storage::new(handle_with(Settings {
            access_key_id: Some("AKIAEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            bucket: "mybucket".to_string(),
            region: "eu-west-1".to_string(),
            credentials_from_store: true,
            ..Settings::default()
        }));

        let bucket = storage.build_bucket().expect("bucket should build");
        assert_eq!(bucket.name(), "mybucket");
        assert_eq!(bucket.region().to_string(), "eu-west-1");
    }

    #[test]
    fn empty_region_falls_back_to_us_east_1() {
        let storage = S3Storage::new(handle_with(Settings {
            access_key_id: Some("AKIAEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            bucket: "mybucket".to_string(),
            credentials_from_store: true,
            ..Settings::default()
        }));

        let bucket = storage.build_bucket().expect("bucket should build");
        assert_eq!(bucket.region().to_string(), "us-east-1");
    }

    #[test]
    fn invalidate_clears_the_memo_and_rebuild_sees_new_settings() {
        let handle = handle_with(Settings {
            access_key_id: Some("AKIAEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            bucket: "first".to_string(),
            credentials_from_store: true,
            ..Settings::default()
        });
        let storage = S3Storage::new(handle.clone());

        assert_eq!(storage.bucket().unwrap().name(), "first");

        handle.replace(Settings {
            access_key_id: Some("AKIAEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            bucket: "second".to_string(),
            credentials_from_store: true,
            ..Settings::default()
        });

        // Memoized handle still points at the old bucket until invalidated.
        assert_eq!(storage.bucket().unwrap().name(), "first");
        storage.invalidate();
        assert_eq!(storage.bucket().unwrap().name(), "second");
    }
}
