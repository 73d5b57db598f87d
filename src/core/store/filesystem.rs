//! Filesystem-backed media store.
//!
//! Treats a directory tree as the media library: walks it with `walkdir`,
//! classifies files by extension, and uses the file path as the stable item
//! id. Screenshots are recognized by filename since plain files carry no
//! platform subtype metadata.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::DynamicImage;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{DeleteOutcome, DeletionExecutor, MediaItem, MediaKind, MediaStore, ThumbnailLoader};
use crate::core::hasher::SUBTYPE_SCREENSHOT;
use crate::error::StoreError;

const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "heic", "heif", "gif", "bmp", "tiff", "tif",
];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "avi", "mkv", "webm"];

/// Media store over a directory tree.
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn kind_of(path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Photo)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    fn looks_like_screenshot(path: &Path) -> bool {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| {
                let stem = stem.to_lowercase();
                stem.contains("screenshot") || stem.starts_with("screen shot")
            })
            .unwrap_or(false)
    }

    fn item_for(path: &Path, kind: MediaKind) -> Option<MediaItem> {
        let metadata = fs::metadata(path).ok()?;

        let created_at: Option<DateTime<Utc>> = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(DateTime::from);

        // Header-only read; videos and undecodable files report 0x0
        let (pixel_width, pixel_height) = if kind == MediaKind::Photo {
            image::image_dimensions(path).unwrap_or((0, 0))
        } else {
            (0, 0)
        };

        let media_subtypes = if kind == MediaKind::Photo && Self::looks_like_screenshot(path) {
            SUBTYPE_SCREENSHOT
        } else {
            0
        };

        Some(MediaItem {
            id: path.display().to_string(),
            kind,
            file_size: metadata.len(),
            created_at,
            pixel_width,
            pixel_height,
            is_favorite: false,
            media_subtypes,
        })
    }
}

impl MediaStore for FsMediaStore {
    fn list_items(&self) -> Result<Vec<MediaItem>, StoreError> {
        if !self.root.exists() {
            return Err(StoreError::LibraryNotFound {
                path: self.root.clone(),
            });
        }

        let mut items = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    if let Some(io) = error.io_error() {
                        if io.kind() == std::io::ErrorKind::PermissionDenied {
                            return Err(StoreError::PermissionDenied {
                                path: error.path().unwrap_or(&self.root).to_path_buf(),
                            });
                        }
                    }
                    warn!("skipping unreadable entry: {error}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(kind) = Self::kind_of(entry.path()) else {
                continue;
            };
            if let Some(item) = Self::item_for(entry.path(), kind) {
                items.push(item);
            }
        }

        debug!(count = items.len(), root = %self.root.display(), "enumerated library");
        Ok(items)
    }

    fn quick_count(&self) -> usize {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && Self::kind_of(entry.path()).is_some())
            .count()
    }

    fn decode_for_hashing(&self, item: &MediaItem) -> Option<DynamicImage> {
        image::open(Path::new(&item.id)).ok()
    }
}

/// Thumbnail loader over the same path-as-id scheme.
pub struct FsThumbnailLoader;

impl ThumbnailLoader for FsThumbnailLoader {
    fn load_thumbnail(&self, id: &str, target_edge: u32) -> Option<DynamicImage> {
        let image = image::open(Path::new(id)).ok()?;
        Some(image.thumbnail(target_edge, target_edge))
    }
}

/// Deletion executor over the filesystem. Fails fast on the first item that
/// cannot be removed.
pub struct FsDeleter;

impl DeletionExecutor for FsDeleter {
    fn delete(&self, ids: &[String]) -> Result<DeleteOutcome, StoreError> {
        let mut outcome = DeleteOutcome::default();
        for id in ids {
            let path = Path::new(id);
            let size = fs::metadata(path)
                .map(|metadata| metadata.len())
                .unwrap_or(0);
            fs::remove_file(path).map_err(|source| StoreError::Deletion {
                id: id.clone(),
                source,
            })?;
            outcome.saved_bytes += size;
            outcome.deleted_ids.push(id.clone());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, brightness: u8) -> PathBuf {
        let path = dir.join(name);
        let img = ImageBuffer::from_fn(32, 32, |_, _| Rgb([brightness, brightness, brightness]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn lists_and_classifies_media_files() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "photo.png", 100);
        write_png(dir.path(), "Screenshot 2024-01-01.png", 200);
        std::fs::write(dir.path().join("clip.mp4"), b"not really a video").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let store = FsMediaStore::new(dir.path());
        let items = store.list_items().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(store.quick_count(), 3);

        let screenshot = items.iter().find(|i| i.id.contains("Screenshot")).unwrap();
        assert!(screenshot.is_screenshot());

        let video = items.iter().find(|i| i.id.ends_with(".mp4")).unwrap();
        assert!(video.is_video());
    }

    #[test]
    fn photo_items_carry_pixel_dimensions() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "photo.png", 100);

        let store = FsMediaStore::new(dir.path());
        let items = store.list_items().unwrap();

        assert_eq!(items[0].pixel_width, 32);
        assert_eq!(items[0].pixel_height, 32);
        assert!(items[0].file_size > 0);
    }

    #[test]
    fn missing_root_is_an_error() {
        let store = FsMediaStore::new("/nonexistent/media/library");
        assert!(matches!(
            store.list_items(),
            Err(StoreError::LibraryNotFound { .. })
        ));
    }

    #[test]
    fn decode_fails_gracefully_for_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.jpg");
        std::fs::write(&path, b"this is not a valid image file").unwrap();

        let store = FsMediaStore::new(dir.path());
        let items = store.list_items().unwrap();
        assert_eq!(items.len(), 1);
        assert!(store.decode_for_hashing(&items[0]).is_none());
    }

    #[test]
    fn thumbnail_loader_resolves_item_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "photo.png", 100);

        let thumb = FsThumbnailLoader
            .load_thumbnail(&path.display().to_string(), 16)
            .unwrap();
        assert!(thumb.width() <= 16 && thumb.height() <= 16);
    }

    #[test]
    fn deleter_removes_files_and_reports_savings() {
        let dir = TempDir::new().unwrap();
        let keep = write_png(dir.path(), "keep.png", 100);
        let remove = write_png(dir.path(), "remove.png", 150);
        let removed_size = fs::metadata(&remove).unwrap().len();

        let outcome = FsDeleter
            .delete(&[remove.display().to_string()])
            .unwrap();

        assert_eq!(outcome.deleted_ids.len(), 1);
        assert_eq!(outcome.saved_bytes, removed_size);
        assert!(keep.exists());
        assert!(!remove.exists());
    }

    #[test]
    fn deleting_missing_file_is_an_error() {
        let result = FsDeleter.delete(&["/nonexistent/photo.png".to_string()]);
        assert!(matches!(result, Err(StoreError::Deletion { .. })));
    }
}
