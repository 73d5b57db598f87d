//! # Core Module
//!
//! The GUI-agnostic scan engine.
//!
//! ## Modules
//! - `store` - Access to the media library behind a trait
//! - `hasher` - Computes 64-bit perceptual hashes
//! - `selector` - Picks the best item of a group
//! - `clusterer` - Groups hashes into duplicate and similar clusters
//! - `orchestrator` - Drives the multi-phase scan pipeline

pub mod clusterer;
pub mod hasher;
pub mod orchestrator;
pub mod selector;
pub mod store;

// Re-export commonly used types
pub use clusterer::{DuplicateGroup, SimilarGroup};
pub use hasher::{dhash64, hamming_distance, ItemHash};
pub use orchestrator::{CancelToken, LibraryScanner, ScanConfig, ScanOrchestrator, ScanSnapshot};
pub use selector::select_best_index;
pub use store::{MediaCategory, MediaItem, MediaKind, MediaStore};
