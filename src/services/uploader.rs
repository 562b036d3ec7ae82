use std::sync::Arc;

use tracing::error;

use crate::config::AppConfig;
use crate::models::payload::{FilePayload, ImagePayload, UploadResult};
use crate::models::settings::{Settings, SettingsHandle};
use crate::services::keys::build_object_key;
use crate::services::storage::{ObjectStore, StorageError};
use crate::services::transform::{fetch_and_resize, TransformError};
use crate::services::validation;

/// Identifier prefixed to every user-facing error message.
const PACKAGE_ID: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Image,
    File,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadKind::Image => f.write_str("image"),
            PayloadKind::File => f.write_str("file"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid {0}")]
    InvalidPayload(PayloadKind),

    #[error("invalid {0} path")]
    InvalidPath(PayloadKind),

    #[error("invalid mime type")]
    InvalidMimeType,

    /// Message keeps the host's translation-key token with the configured
    /// limit in kilobytes.
    #[error("[[error:file-too-big, {limit}]]")]
    FileTooBig { limit: String },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl UploadError {
    /// The display form callers receive, prefixed for traceability.
    pub fn prefixed(&self) -> String {
        format!("{PACKAGE_ID} :: {self}")
    }
}

/// Composes validation, the optional resize transform, key generation, and
/// the backend write. Exactly one backend write happens per successful
/// upload; any failure short-circuits before the write.
pub struct Uploader {
    config: Arc<AppConfig>,
    settings: SettingsHandle,
    store: Arc<dyn ObjectStore>,
    http: reqwest::Client,
}

impl Uploader {
    pub fn new(
        config: Arc<AppConfig>,
        settings: SettingsHandle,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            settings,
            store,
            http: reqwest::Client::new(),
        }
    }

    /// Upload an image payload from a local temp path or a remote URL.
    /// Remote images are resized to the configured square dimension before
    /// storage; local ones are stored as-is.
    pub async fn upload_image(
        &self,
        image: Option<ImagePayload>,
    ) -> Result<UploadResult, UploadError> {
        self.logged(self.upload_image_inner(image).await)
    }

    /// Upload a generic file payload from a local temp path.
    pub async fn upload_file(
        &self,
        file: Option<FilePayload>,
    ) -> Result<UploadResult, UploadError> {
        self.logged(self.upload_file_inner(file).await)
    }

    async fn upload_image_inner(
        &self,
        image: Option<ImagePayload>,
    ) -> Result<UploadResult, UploadError> {
        let image = image.ok_or(UploadError::InvalidPayload(PayloadKind::Image))?;

        // Size first, shared by both the local-path and remote-url branches.
        self.check_size(image.size)?;

        match image.url.as_deref() {
            None => {
                let path = image
                    .path
                    .as_deref()
                    .ok_or(UploadError::InvalidPath(PayloadKind::Image))?;
                if !validation::allowed_image_type(path) {
                    return Err(UploadError::InvalidMimeType);
                }

                let body = self.read_local(path).await?;
                self.write_and_link(&image.name, body).await
            }
            Some(url) => {
                if !validation::allowed_image_type(url) {
                    return Err(UploadError::InvalidMimeType);
                }
                let filename = url.rsplit('/').next().unwrap_or(url).to_string();

                let body = fetch_and_resize(&self.http, url, self.config.image_dimension()).await?;
                self.write_and_link(&filename, body).await
            }
        }
    }

    async fn upload_file_inner(
        &self,
        file: Option<FilePayload>,
    ) -> Result<UploadResult, UploadError> {
        let file = file.ok_or(UploadError::InvalidPayload(PayloadKind::File))?;
        let path = file
            .path
            .as_deref()
            .ok_or(UploadError::InvalidPath(PayloadKind::File))?;

        self.check_size(file.size)?;

        let body = self.read_local(path).await?;
        self.write_and_link(&file.name, body).await
    }

    fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if validation::exceeds_limit(size, self.config.max_file_size_bytes()) {
            return Err(UploadError::FileTooBig {
                limit: self.config.max_file_size_raw().to_string(),
            });
        }
        Ok(())
    }

    async fn read_local(&self, path: &str) -> Result<Vec<u8>, UploadError> {
        tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.to_string(),
            source,
        })
    }

    /// The single backend write plus public URL construction.
    async fn write_and_link(
        &self,
        filename: &str,
        body: Vec<u8>,
    ) -> Result<UploadResult, UploadError> {
        let settings = self.settings.current();
        let key = build_object_key(&settings.path, filename);
        let content_type = validation::content_type_for(filename);

        self.store.put(&key, &body, content_type).await?;

        Ok(UploadResult {
            name: filename.to_string(),
            url: public_url(&settings, &key),
        })
    }

    fn logged<T>(&self, result: Result<T, UploadError>) -> Result<T, UploadError> {
        if let Err(err) = &result {
            error!("{}", err.prefixed());
        }
        result
    }
}

/// Public URL for a stored object. An empty host override yields the
/// provider-default HTTPS form; a scheme-less override defaults to HTTP.
pub fn public_url(settings: &Settings, key: &str) -> String {
    if settings.host.is_empty() {
        format!("https://{}.s3.amazonaws.com/{key}", settings.bucket)
    } else if settings.host.starts_with("http") {
        format!("{}/{key}", settings.host)
    } else {
        format!("http://{}/{key}", settings.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_host(bucket: &str, host: &str) -> Settings {
        Settings {
            bucket: bucket.to_string(),
            host: host.to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn default_host_is_virtual_hosted_https() {
        let url = public_url(&settings_with_host("mybucket", ""), "abc.png");
        assert_eq!(url, "https://mybucket.s3.amazonaws.com/abc.png");
    }

    #[test]
    fn scheme_less_override_defaults_to_http() {
        let url = public_url(&settings_with_host("mybucket", "example.com"), "abc.png");
        assert_eq!(url, "http://example.com/abc.png");
    }

    #[test]
    fn explicit_scheme_is_preserved() {
        let url = public_url(
            &settings_with_host("mybucket", "https://example.com"),
            "abc.png",
        );
        assert_eq!(url, "https://example.com/abc.png");
    }

    #[test]
    fn error_messages_carry_the_package_prefix() {
        let err = UploadError::InvalidPayload(PayloadKind::Image);
        assert_eq!(err.prefixed(), "s3-upload-bridge :: invalid image");

        let err = UploadError::FileTooBig {
            limit: "2048".to_string(),
        };
        assert_eq!(
            err.prefixed(),
            "s3-upload-bridge :: [[error:file-too-big, 2048]]"
        );
    }
}
