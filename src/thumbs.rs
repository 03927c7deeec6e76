/// Image acquisition and caching
///
/// Thumbnails and full-size images live next to the catalog: on disk for
/// a local site build, on an object-storage host for the published one.
/// Remote fetches go through a byte cache in the user's cache directory
/// (~/.cache/photowall/thumbs on Linux) keyed by a digest of the source
/// URL, so revisiting a gallery does not re-download every thumbnail.
///
/// Pixel dimensions are probed from the encoded header without a full
/// decode; they feed the masonry extent of the card.

use std::io::Cursor;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// A fetched image ready for display.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub handle: iced::widget::image::Handle,
    /// Pixel dimensions from the encoded header, when the format allows
    /// probing them
    pub dimensions: Option<(u32, u32)>,
}

/// Lifecycle of one card's image fetch.
#[derive(Debug, Clone)]
pub enum ThumbState {
    Loading,
    Ready(FetchedImage),
    Failed,
}

/// Fetch an image from a URL or a local path.
///
/// A failure here never aborts anything larger; the caller degrades the
/// card to a placeholder.
pub async fn fetch_image(source: String) -> Result<FetchedImage, String> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(&source).await?
    } else {
        tokio::fs::read(&source)
            .await
            .map_err(|e| format!("read {source}: {e}"))?
    };

    let dimensions = probe_dimensions(&bytes);

    Ok(FetchedImage {
        handle: iced::widget::image::Handle::from_bytes(bytes),
        dimensions,
    })
}

/// Fetch remote bytes, consulting and populating the disk cache. Cache
/// I/O failures are logged and ignored; the cache is best-effort.
async fn fetch_remote(url: &str) -> Result<Vec<u8>, String> {
    let cached = cache_path(url);

    if let Some(path) = &cached {
        if let Ok(bytes) = tokio::fs::read(path).await {
            return Ok(bytes);
        }
    }

    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| format!("fetch {url}: {e}"))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("fetch {url}: {e}"))?
        .to_vec();

    if let Some(path) = &cached {
        if let Some(parent) = path.parent() {
            let _ = tokio::fs::create_dir_all(parent).await;
        }
        if let Err(e) = tokio::fs::write(path, &bytes).await {
            tracing::debug!(url, error = %e, "image cache write failed");
        }
    }

    Ok(bytes)
}

/// Read width and height out of the encoded header.
fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Cache location for a remote image: user cache directory plus a digest
/// of the source URL.
fn cache_path(url: &str) -> Option<PathBuf> {
    let mut path = dirs::cache_dir()?;
    path.push("photowall");
    path.push("thumbs");
    path.push(format!("{:x}", Sha256::digest(url.as_bytes())));
    Some(path)
}
