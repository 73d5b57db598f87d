//! # Store Module
//!
//! The boundary between the scan core and whatever holds the photos.
//!
//! The core never touches a platform media API directly; it is handed a
//! [`MediaStore`] that enumerates opaque handles ([`MediaItem`]) and decodes
//! them on demand. Thumbnails and deletion are presentation-layer concerns
//! behind their own traits; the core only guarantees that item ids stay
//! stable for those lookups.

mod filesystem;

pub use filesystem::{FsDeleter, FsMediaStore, FsThumbnailLoader};

use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::core::hasher::{ItemHash, SUBTYPE_SCREENSHOT};
use crate::error::StoreError;

/// Coarse media kind of a library item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Video,
}

/// Category used for dashboard sample collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaCategory {
    Videos,
    Screenshots,
    Photos,
}

/// Opaque handle to one media item plus the metadata the scan needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Stable identifier within the store
    pub id: String,
    pub kind: MediaKind,
    pub file_size: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub is_favorite: bool,
    /// Raw platform subtype bitmask
    pub media_subtypes: u32,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    pub fn is_screenshot(&self) -> bool {
        self.kind == MediaKind::Photo && self.media_subtypes & SUBTYPE_SCREENSHOT != 0
    }

    /// Category this item contributes samples to
    pub fn category(&self) -> MediaCategory {
        if self.is_video() {
            MediaCategory::Videos
        } else if self.is_screenshot() {
            MediaCategory::Screenshots
        } else {
            MediaCategory::Photos
        }
    }

    /// Pair this item's metadata with a computed hash
    pub fn with_hash(&self, hash: u64) -> ItemHash {
        ItemHash {
            id: self.id.clone(),
            hash,
            created_at: self.created_at,
            file_size: self.file_size,
            pixel_width: self.pixel_width,
            pixel_height: self.pixel_height,
            is_favorite: self.is_favorite,
            media_subtypes: self.media_subtypes,
        }
    }
}

/// Access to a media library.
///
/// Implement this to plug the scan pipeline into a platform media store;
/// [`FsMediaStore`] is the built-in filesystem implementation.
pub trait MediaStore: Send + Sync {
    /// Enumerate every item in the library, in the store's stable order.
    fn list_items(&self) -> Result<Vec<MediaItem>, StoreError>;

    /// Cheap item count without full enumeration.
    fn quick_count(&self) -> usize;

    /// Decode an item's pixels for hashing.
    ///
    /// `None` means the item could not be decoded; the caller counts it as a
    /// failed item and moves on.
    fn decode_for_hashing(&self, item: &MediaItem) -> Option<DynamicImage>;
}

/// Thumbnail access for presentation layers. Not used by the scan core.
pub trait ThumbnailLoader: Send + Sync {
    /// Load a thumbnail with the given longest edge, or `None` if the item
    /// is gone or undecodable.
    fn load_thumbnail(&self, id: &str, target_edge: u32) -> Option<DynamicImage>;
}

/// Outcome of a deletion request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted_ids: Vec<String>,
    pub saved_bytes: u64,
}

/// Deletion capability for presentation layers. Never called by the scan
/// core; the group lists and best-result indices are its only input.
pub trait DeletionExecutor: Send + Sync {
    fn delete(&self, ids: &[String]) -> Result<DeleteOutcome, StoreError>;
}
