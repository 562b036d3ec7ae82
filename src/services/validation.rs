use mime_guess::MimeGuess;

/// Content types accepted for image uploads. The legacy JPEG spellings stay
/// on the list for compatibility with older clients.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/pjpeg",
    "image/jpg",
    "image/svg+xml",
];

/// Content type inferred from a filename or URL extension. No sniffing of
/// the payload bytes happens here; the extension is the contract.
pub fn lookup_mime(name: &str) -> Option<&'static str> {
    MimeGuess::from_path(name).first_raw()
}

/// Content type for the backend write, with the conventional fallback.
pub fn content_type_for(name: &str) -> &'static str {
    lookup_mime(name).unwrap_or("application/octet-stream")
}

pub fn allowed_image_type(name: &str) -> bool {
    lookup_mime(name).is_some_and(|mime| ALLOWED_IMAGE_TYPES.contains(&mime))
}

/// Size check against the configured limit; `None` means no limit is
/// enforced.
pub fn exceeds_limit(size: u64, max_bytes: Option<u64>) -> bool {
    max_bytes.is_some_and(|max| size > max)
}
