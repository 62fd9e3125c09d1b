// SPDX-License-Identifier: GPL-3.0-only

//! Gallery storage and temporary capture files

use crate::backends::camera::ImageRef;
use crate::constants::gallery;
use crate::errors::SaveError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persists captured images as gallery assets
pub trait GalleryWriter: Send + Sync {
    /// Copy `image` into the gallery and return the asset's path
    fn create_asset(&self, image: &ImageRef) -> Result<PathBuf, SaveError>;
}

/// Gallery directory for an album (`~/Pictures/<album>`)
pub fn gallery_directory(album: &str) -> PathBuf {
    let pictures = dirs::picture_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Path::new(&home).join("Pictures")
    });
    pictures.join(album)
}

/// Directory for captures awaiting retake or save
pub fn capture_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(gallery::DEFAULT_ALBUM)
}

/// Gallery stored as plain files in a pictures directory
pub struct PicturesGallery {
    root: PathBuf,
}

impl PicturesGallery {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `IMG_<timestamp>.jpg`, or `IMG_<timestamp>_<n>.jpg` if taken
    fn next_asset_path(&self, timestamp: &str) -> PathBuf {
        let first = self
            .root
            .join(format!("IMG_{}.{}", timestamp, gallery::PHOTO_EXTENSION));
        if !first.exists() {
            return first;
        }
        (1u32..)
            .map(|n| {
                self.root
                    .join(format!("IMG_{}_{}.{}", timestamp, n, gallery::PHOTO_EXTENSION))
            })
            .find(|p| !p.exists())
            .unwrap_or(first)
    }
}

impl GalleryWriter for PicturesGallery {
    fn create_asset(&self, image: &ImageRef) -> Result<PathBuf, SaveError> {
        std::fs::create_dir_all(&self.root)?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let target = self.next_asset_path(&timestamp);

        info!(source = %image, target = %target.display(), "Saving photo to gallery");
        std::fs::copy(image.path(), &target)?;
        Ok(target)
    }
}

/// Remove a temporary capture file once it is no longer pending
///
/// Only files inside `cache_dir` are touched.
pub async fn discard_capture(image: ImageRef, cache_dir: PathBuf) {
    if !image.path().starts_with(&cache_dir) {
        debug!(path = %image, "Not a cached capture, leaving it alone");
        return;
    }
    match tokio::fs::remove_file(image.path()).await {
        Ok(()) => debug!(path = %image, "Discarded capture"),
        Err(e) => warn!(path = %image, error = %e, "Failed to discard capture"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_directory_ends_with_album() {
        assert!(gallery_directory("holiday").ends_with("holiday"));
    }

    #[test]
    fn test_next_asset_path_avoids_collisions() {
        let root = std::env::temp_dir().join(format!("quickcam-gallery-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        let gallery = PicturesGallery::new(root.clone());

        let first = gallery.next_asset_path("20260101_120000");
        assert_eq!(first, root.join("IMG_20260101_120000.jpg"));
        std::fs::write(&first, b"a").unwrap();

        let second = gallery.next_asset_path("20260101_120000");
        assert_eq!(second, root.join("IMG_20260101_120000_1.jpg"));

        std::fs::remove_dir_all(&root).unwrap();
    }

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("quickcam-{}-{}", tag, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_create_asset_copies_into_gallery() {
        let root = temp_root("storage");
        let source = root.join("cache").join("capture-1.jpg");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, b"jpeg bytes").unwrap();

        let gallery = PicturesGallery::new(root.join("Pictures").join("quickcam"));
        let asset = gallery.create_asset(&ImageRef::new(&source)).unwrap();

        assert!(asset.starts_with(root.join("Pictures").join("quickcam")));
        let name = asset.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("IMG_"), "unexpected name {}", name);
        assert!(name.ends_with(".jpg"), "unexpected name {}", name);
        assert_eq!(std::fs::read(&asset).unwrap(), b"jpeg bytes");
        assert!(source.exists(), "the pending capture is left for the caller");

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_create_asset_missing_source_is_io_error() {
        let root = temp_root("storage");
        let gallery = PicturesGallery::new(root.join("album"));

        let result = gallery.create_asset(&ImageRef::new(root.join("gone.jpg")));
        assert!(matches!(result, Err(SaveError::Io(_))));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_discard_capture_removes_cached_file() {
        let cache = temp_root("cache");
        std::fs::create_dir_all(&cache).unwrap();
        let capture = cache.join("capture-1.jpg");
        std::fs::write(&capture, b"x").unwrap();

        discard_capture(ImageRef::new(&capture), cache.clone()).await;

        assert!(!capture.exists());
        std::fs::remove_dir_all(&cache).unwrap();
    }

    #[tokio::test]
    async fn test_discard_capture_ignores_files_outside_cache() {
        let root = temp_root("storage");
        let cache = root.join("cache");
        std::fs::create_dir_all(&cache).unwrap();
        let photo = root.join("IMG_20260101_120000.jpg");
        std::fs::write(&photo, b"x").unwrap();

        discard_capture(ImageRef::new(&photo), cache).await;

        assert!(photo.exists());
        std::fs::remove_dir_all(&root).unwrap();
    }
}
