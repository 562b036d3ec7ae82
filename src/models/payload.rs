use serde::{Deserialize, Serialize};

/// Inbound image upload: either a local temp file or a remote URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagePayload {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Inbound generic file upload, always sourced from a local temp file.
#[derive(Debug, Clone, Deserialize)]
pub struct FilePayload {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub path: Option<String>,
}

/// Successful upload outcome: original filename plus the public URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub name: String,
    pub url: String,
}
