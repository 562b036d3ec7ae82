use std::io::Cursor;

use futures::{Stream, StreamExt};
use image::imageops::FilterType;

/// Fetch a remote image and resize it to a `dimension` x `dimension` square,
/// returning the re-encoded bytes in the source format. The backend write
/// API needs a fully-buffered body with a known length, so the fetched
/// stream is collected into memory up front; the cost is proportional to
/// the source image size and accepted as a tradeoff.
pub async fn fetch_and_resize(
    http: &reqwest::Client,
    url: &str,
    dimension: u32,
) -> Result<Vec<u8>, TransformError> {
    let response = http.get(url).send().await?.error_for_status()?;
    let source = collect_stream(response.bytes_stream()).await?;
    resize_to_square(&source, dimension)
}

/// Accumulate a byte stream into a single in-memory buffer.
pub(crate) async fn collect_stream<S, B>(stream: S) -> Result<Vec<u8>, reqwest::Error>
where
    S: Stream<Item = Result<B, reqwest::Error>>,
    B: AsRef<[u8]>,
{
    let mut stream = std::pin::pin!(stream);
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(chunk?.as_ref());
    }
    Ok(buffer)
}

/// Crop-to-fill square resize: the shorter edge is scaled to `dimension`
/// and the overflow on the longer edge is cropped away.
pub fn resize_to_square(bytes: &[u8], dimension: u32) -> Result<Vec<u8>, TransformError> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let resized = decoded.resize_to_fill(dimension, dimension, FilterType::Lanczos3);

    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, format)?;
    Ok(out.into_inner())
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("image fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("image resize failed: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn resize_produces_exact_square() {
        let source = png_bytes(640, 200);
        let resized = resize_to_square(&source, 128).unwrap();

        let decoded = image::load_from_memory(&resized).unwrap();
        assert_eq!(decoded.width(), 128);
        assert_eq!(decoded.height(), 128);
    }

    #[test]
    fn resize_keeps_the_source_format() {
        let source = png_bytes(64, 64);
        let resized = resize_to_square(&source, 32).unwrap();
        assert_eq!(image::guess_format(&resized).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = resize_to_square(b"definitely not an image", 128).unwrap_err();
        assert!(matches!(err, TransformError::Image(_)));
    }

    #[tokio::test]
    async fn collect_stream_concatenates_chunks() {
        let chunks: Vec<Result<&[u8], reqwest::Error>> =
            vec![Ok(b"hello ".as_slice()), Ok(b"world".as_slice())];
        let buffer = collect_stream(futures::stream::iter(chunks)).await.unwrap();
        assert_eq!(buffer, b"hello world");
    }
}
