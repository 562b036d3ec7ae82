use serde::Deserialize;

/// Image dimension used when the configured value is unset or non-numeric.
pub const DEFAULT_IMAGE_DIMENSION: u32 = 128;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Fallback AWS region when none is persisted.
    #[serde(default)]
    pub aws_default_region: Option<String>,

    /// Fallback bucket name when none is persisted.
    #[serde(default)]
    pub s3_uploads_bucket: Option<String>,

    /// Fallback URL host override when none is persisted.
    #[serde(default)]
    pub s3_uploads_host: Option<String>,

    /// Fallback object path prefix when none is persisted.
    #[serde(default)]
    pub s3_uploads_path: Option<String>,

    /// Maximum upload size in kilobytes. Carried as a string because the
    /// host config surfaces it untyped; unparseable values disable the check.
    #[serde(default)]
    pub maximum_file_size: Option<String>,

    /// Target square dimension for remote image resizing, in pixels.
    #[serde(default)]
    pub profile_image_dimension: Option<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Size limit in bytes, or `None` when unset or unparseable.
    pub fn max_file_size_bytes(&self) -> Option<u64> {
        self.maximum_file_size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(|kb| kb * 1024)
    }

    /// Raw configured limit, embedded verbatim in the size-limit error token.
    pub fn max_file_size_raw(&self) -> &str {
        self.maximum_file_size.as_deref().unwrap_or("")
    }

    /// Resize dimension in pixels, defaulting to 128.
    pub fn image_dimension(&self) -> u32 {
        self.profile_image_dimension
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_IMAGE_DIMENSION)
    }

    pub fn region_default(&self) -> &str {
        self.aws_default_region.as_deref().unwrap_or("")
    }

    pub fn bucket_default(&self) -> &str {
        self.s3_uploads_bucket.as_deref().unwrap_or("")
    }

    pub fn host_default(&self) -> &str {
        self.s3_uploads_host.as_deref().unwrap_or("")
    }

    pub fn path_default(&self) -> &str {
        self.s3_uploads_path.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config() -> AppConfig {
        AppConfig {
            bind_addr: default_bind_addr(),
            aws_default_region: None,
            s3_uploads_bucket: None,
            s3_uploads_host: None,
            s3_uploads_path: None,
            maximum_file_size: None,
            profile_image_dimension: None,
        }
    }

    #[test]
    fn size_limit_parses_kilobytes() {
        let mut config = bare_config();
        config.maximum_file_size = Some("1024".to_string());
        assert_eq!(config.max_file_size_bytes(), Some(1024 * 1024));
    }

    #[test]
    fn unparseable_size_limit_disables_check() {
        let mut config = bare_config();
        config.maximum_file_size = Some("lots".to_string());
        assert_eq!(config.max_file_size_bytes(), None);

        config.maximum_file_size = None;
        assert_eq!(config.max_file_size_bytes(), None);
    }

    #[test]
    fn dimension_defaults_to_128() {
        let mut config = bare_config();
        assert_eq!(config.image_dimension(), 128);

        config.profile_image_dimension = Some("not-a-number".to_string());
        assert_eq!(config.image_dimension(), 128);

        config.profile_image_dimension = Some("256".to_string());
        assert_eq!(config.image_dimension(), 256);
    }
}
