//! Upload directory handling.
//!
//! Raw uploads are written as `{field}-{millis}-{random}.{ext}`, then
//! re-encoded as JPEG under `compressed-{stem}.jpg`. Only compressed files
//! are referenced by listings; raw files are removed once processed.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use tracing::{debug, info, warn};

use crate::domain::{DomainError, DomainResult, PhotoKind};

/// File extensions accepted for photo uploads.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

const COMPRESSED_PREFIX: &str = "compressed-";

/// A raw upload written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub kind: PhotoKind,
    pub file_name: String,
    pub path: PathBuf,
}

pub struct ImageStore {
    root: PathBuf,
    max_width: u32,
    quality: u8,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, max_width: u32, quality: u8) -> Self {
        Self {
            root: root.into(),
            max_width,
            quality,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Lower-cased extension of `file_name` when it is an allowed image type.
    pub fn allowed_extension(file_name: &str) -> Option<String> {
        let ext = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
    }

    /// Writes a raw upload for `kind`. Rejects non-image extensions.
    pub async fn save_upload(
        &self,
        kind: PhotoKind,
        original_name: &str,
        bytes: &[u8],
    ) -> DomainResult<StoredUpload> {
        let ext = Self::allowed_extension(original_name).ok_or_else(|| {
            DomainError::Validation(format!(
                "{}: only {} files are allowed",
                kind.field_name(),
                ALLOWED_EXTENSIONS.join("/")
            ))
        })?;

        let file_name = format!(
            "{}-{}-{}.{}",
            kind.field_name(),
            Utc::now().timestamp_millis(),
            rand::random::<u32>() % 1_000_000_000,
            ext
        );
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Storage(format!("Failed to store upload: {}", e)))?;

        debug!("Stored upload {} ({} bytes)", file_name, bytes.len());
        Ok(StoredUpload {
            kind,
            file_name,
            path,
        })
    }

    /// Re-encodes an upload as a width-limited JPEG and returns the new
    /// file name. Images narrower than the limit keep their size.
    pub async fn compress(&self, upload: &StoredUpload) -> DomainResult<String> {
        let stem = Path::new(&upload.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&upload.file_name);
        let compressed_name = format!("{}{}.jpg", COMPRESSED_PREFIX, stem);

        let src = upload.path.clone();
        let dst = self.root.join(&compressed_name);
        let (max_width, quality) = (self.max_width, self.quality);

        let result = tokio::task::spawn_blocking(move || compress_file(&src, &dst, max_width, quality))
            .await
            .map_err(|e| DomainError::Storage(format!("Image task failed: {}", e)))?;

        match result {
            Ok((width, height)) => {
                debug!("Compressed {} to {}x{}", compressed_name, width, height);
                Ok(compressed_name)
            }
            Err(e) => {
                warn!("Could not process image {}: {}", upload.file_name, e);
                Err(DomainError::Validation(format!(
                    "{}: file is not a readable image",
                    upload.kind.field_name()
                )))
            }
        }
    }

    /// Removes raw uploads once they have been processed or abandoned.
    pub async fn discard(&self, uploads: &[StoredUpload]) {
        for upload in uploads {
            if let Err(e) = tokio::fs::remove_file(&upload.path).await {
                warn!("Failed to remove upload {}: {}", upload.file_name, e);
            }
        }
    }

    /// Removes stored photo files by name. Missing files are ignored.
    pub async fn remove_files(&self, names: &[String]) {
        for name in names {
            // Stored names never contain separators; skip anything that does.
            if name.contains('/') || name.contains('\\') || name.contains("..") {
                continue;
            }
            match tokio::fs::remove_file(self.root.join(name)).await {
                Ok(()) => debug!("Removed photo {}", name),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove photo {}: {}", name, e),
            }
        }
    }

    /// Deletes raw uploads left behind by interrupted requests.
    pub async fn sweep_originals(&self) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to scan upload directory: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let is_raw = PhotoKind::ALL
                .iter()
                .any(|k| name.starts_with(&format!("{}-", k.field_name())));
            if is_raw && tokio::fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("🧹 Removed {} unprocessed uploads", removed);
        }
        removed
    }
}

fn compress_file(
    src: &Path,
    dst: &Path,
    max_width: u32,
    quality: u8,
) -> Result<(u32, u32), image::ImageError> {
    let img = ImageReader::open(src)?.with_guessed_format()?.decode()?;
    let img = if img.width() > max_width {
        img.resize(max_width, u32::MAX, FilterType::Triangle)
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let mut writer = std::io::BufWriter::new(std::fs::File::create(dst)?);
    JpegEncoder::new_with_quality(&mut writer, quality).encode_image(&rgb)?;
    writer.flush()?;
    Ok(rgb.dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> ImageStore {
        let dir = std::env::temp_dir().join(format!("circles-images-{}", uuid::Uuid::new_v4()));
        let store = ImageStore::new(dir, 800, 70);
        store.ensure_root().await.unwrap();
        store
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn only_image_extensions_are_allowed() {
        assert_eq!(ImageStore::allowed_extension("photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(ImageStore::allowed_extension("anim.webp").as_deref(), Some("webp"));
        assert_eq!(ImageStore::allowed_extension("script.exe"), None);
        assert_eq!(ImageStore::allowed_extension("noext"), None);
    }

    #[tokio::test]
    async fn wide_images_are_scaled_to_max_width() {
        let store = temp_store().await;
        let upload = store
            .save_upload(PhotoKind::Top, "banner.png", &png_bytes(1600, 400))
            .await
            .unwrap();
        assert!(upload.file_name.starts_with("topPhoto-"));

        let name = store.compress(&upload).await.unwrap();
        assert!(name.starts_with("compressed-topPhoto-"));
        assert!(name.ends_with(".jpg"));

        let dims = image::image_dimensions(store.root().join(&name)).unwrap();
        assert_eq!(dims, (800, 200));
    }

    #[tokio::test]
    async fn small_images_are_not_upscaled() {
        let store = temp_store().await;
        let upload = store
            .save_upload(PhotoKind::Sub, "small.png", &png_bytes(300, 100))
            .await
            .unwrap();
        let name = store.compress(&upload).await.unwrap();
        let dims = image::image_dimensions(store.root().join(&name)).unwrap();
        assert_eq!(dims, (300, 100));
    }

    #[tokio::test]
    async fn unreadable_images_are_rejected() {
        let store = temp_store().await;
        let upload = store
            .save_upload(PhotoKind::Calendar, "fake.png", b"not an image")
            .await
            .unwrap();
        assert!(matches!(store.compress(&upload).await, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn disallowed_uploads_are_not_written() {
        let store = temp_store().await;
        let result = store.save_upload(PhotoKind::Top, "virus.exe", b"MZ").await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        let mut entries = tokio::fs::read_dir(store.root()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sweep_keeps_compressed_files() {
        let store = temp_store().await;
        let upload = store
            .save_upload(PhotoKind::Sub, "a.png", &png_bytes(10, 10))
            .await
            .unwrap();
        let compressed = store.compress(&upload).await.unwrap();

        assert_eq!(store.sweep_originals().await, 1);
        assert!(!upload.path.exists());
        assert!(store.root().join(&compressed).exists());
    }

    #[tokio::test]
    async fn discard_and_remove_clean_up_files() {
        let store = temp_store().await;
        let upload = store
            .save_upload(PhotoKind::Top, "a.png", &png_bytes(10, 10))
            .await
            .unwrap();
        let compressed = store.compress(&upload).await.unwrap();

        store.discard(std::slice::from_ref(&upload)).await;
        assert!(!upload.path.exists());

        store.remove_files(&[compressed.clone(), "missing.jpg".into()]).await;
        assert!(!store.root().join(&compressed).exists());
    }
}
