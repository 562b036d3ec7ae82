use std::path::Path;

use uuid::Uuid;

/// Build the storage object key: normalized path prefix, a fresh UUID, and
/// the original filename's extension. Uniqueness comes from the UUID alone,
/// never from the filename. The `[<prefix>/]<uuid><.ext>` layout is a
/// stability contract for previously issued URLs.
pub fn build_object_key(path_prefix: &str, filename: &str) -> String {
    let mut prefix = if path_prefix.is_empty() {
        "/".to_string()
    } else {
        path_prefix.to_string()
    };
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    // Object keys never start with a slash.
    let prefix = prefix.strip_prefix('/').unwrap_or(&prefix);

    format!("{prefix}{}{}", Uuid::new_v4(), extension_of(filename))
}

/// The extension including its dot, or empty when the filename has none.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prefix_yields_bare_key() {
        let key = build_object_key("", "photo.png");
        assert!(!key.starts_with('/'));
        assert!(!key.contains('/'));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn prefix_gains_trailing_slash_and_loses_leading_one() {
        let key = build_object_key("/uploads", "photo.png");
        assert!(key.starts_with("uploads/"));
        assert!(!key.starts_with('/'));

        let key = build_object_key("uploads/", "photo.png");
        assert!(key.starts_with("uploads/"));
    }

    #[test]
    fn extension_survives_and_is_optional() {
        assert!(build_object_key("", "archive.tar.gz").ends_with(".gz"));
        let key = build_object_key("", "no-extension");
        assert!(!key.contains('.'));
    }

    #[test]
    fn same_filename_yields_distinct_keys() {
        let a = build_object_key("uploads", "same.png");
        let b = build_object_key("uploads", "same.png");
        assert_ne!(a, b);
    }
}
