//! # Orchestrator Module
//!
//! Drives the full library scan: enumerate → categorize → hash → cluster →
//! aggregate → publish.
//!
//! ## Concurrency Model
//! One background thread runs the whole pipeline sequentially. Batch
//! boundaries are the cancellation checkpoints; a cancelled scan stops
//! advancing without publishing a terminal state. Results are swapped in as
//! one immutable snapshot when the scan completes, never incrementally.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, info};

use crate::core::clusterer::{
    find_duplicate_groups, find_similar_groups, DuplicateGroup, SimilarGroup,
    DEFAULT_DUPLICATE_THRESHOLD, DEFAULT_SIMILAR_THRESHOLD,
};
use crate::core::hasher::dhash64;
use crate::core::store::{MediaCategory, MediaItem, MediaStore};
use crate::events::{progress_channel, ProgressReceiver, ProgressSender, ScanProgress, ScanResult};

/// Items per enumeration batch
pub const SCAN_BATCH_SIZE: usize = 100;
/// Items per hashing batch
pub const HASH_BATCH_SIZE: usize = 50;
/// Publish a scanning update every Nth batch (the last batch always publishes)
pub const PROGRESS_UPDATE_INTERVAL: usize = 3;
/// Sample items retained per category for dashboard thumbnails
pub const SAMPLES_PER_CATEGORY: usize = 4;

/// Tunable thresholds for a scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Hamming distance at or below which items are duplicates
    pub duplicate_threshold: u32,
    /// Hamming distance at or below which items are similar
    pub similar_threshold: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            similar_threshold: DEFAULT_SIMILAR_THRESHOLD,
        }
    }
}

/// Shared cancellation flag, polled at batch boundaries.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Everything a completed scan retains for later retrieval.
#[derive(Debug, Clone, Default)]
pub struct ScanSnapshot {
    pub result: ScanResult,
    pub duplicate_groups: Vec<DuplicateGroup>,
    pub similar_groups: Vec<SimilarGroup>,
    /// Up to [`SAMPLES_PER_CATEGORY`] items per category for thumbnails
    pub samples: HashMap<MediaCategory, Vec<MediaItem>>,
}

/// Runs scans over an injected media store and retains the snapshot of the
/// last completed one.
pub struct ScanOrchestrator<S: MediaStore> {
    store: Arc<S>,
    config: ScanConfig,
    snapshot: Mutex<ScanSnapshot>,
}

impl<S: MediaStore> ScanOrchestrator<S> {
    pub fn new(store: Arc<S>, config: ScanConfig) -> Self {
        Self {
            store,
            config,
            snapshot: Mutex::new(ScanSnapshot::default()),
        }
    }

    /// Snapshot of the last completed scan (empty before any scan finishes).
    pub fn latest_snapshot(&self) -> ScanSnapshot {
        self.snapshot.lock().unwrap().clone()
    }

    /// Execute the full pipeline, publishing progress along the way.
    ///
    /// Returns the snapshot on completion; the retained snapshot is replaced
    /// before `Completed` is published. Returns `None` when the run was
    /// cancelled (nothing further is published) or when enumeration failed
    /// (a `Failed` state has been published).
    pub fn run(&self, progress: &ProgressSender, cancel: &CancelToken) -> Option<ScanSnapshot> {
        // Phase 1: enumerate & categorize
        let items = match self.store.list_items() {
            Ok(items) => items,
            Err(error) => {
                progress.send(ScanProgress::Failed(error.to_string()));
                return None;
            }
        };

        let total = items.len();
        if total == 0 {
            return Some(self.finish(ScanSnapshot::default(), progress));
        }

        let mut result = ScanResult {
            total_items: total,
            ..Default::default()
        };
        let mut samples: HashMap<MediaCategory, Vec<MediaItem>> = HashMap::new();
        let mut photo_items: Vec<MediaItem> = Vec::new();

        for (batch_index, batch) in items.chunks(SCAN_BATCH_SIZE).enumerate() {
            if cancel.is_cancelled() {
                debug!("scan cancelled during enumeration");
                return None;
            }

            for item in batch {
                result.total_size_bytes += item.file_size;

                if item.is_video() {
                    result.total_videos += 1;
                    result.videos_size_bytes += item.file_size;
                } else {
                    if item.is_screenshot() {
                        result.total_screenshots += 1;
                        result.screenshots_size_bytes += item.file_size;
                    }
                    result.total_photos += 1;
                    result.photos_size_bytes += item.file_size;
                    photo_items.push(item.clone());
                }

                let category_samples = samples.entry(item.category()).or_default();
                if category_samples.len() < SAMPLES_PER_CATEGORY {
                    category_samples.push(item.clone());
                }
            }

            let processed = ((batch_index + 1) * SCAN_BATCH_SIZE).min(total);
            if batch_index % PROGRESS_UPDATE_INTERVAL == 0 || processed == total {
                progress.send(ScanProgress::Scanning { processed, total });
            }
        }

        info!(
            photos = result.total_photos,
            videos = result.total_videos,
            screenshots = result.total_screenshots,
            "enumeration complete"
        );

        // Phase 2: hash all photo items
        let hash_total = photo_items.len();
        progress.send(ScanProgress::Hashing {
            processed: 0,
            total: hash_total,
        });

        let mut hashes = Vec::with_capacity(hash_total);
        let mut processed = 0;
        for batch in photo_items.chunks(HASH_BATCH_SIZE) {
            if cancel.is_cancelled() {
                debug!("scan cancelled during hashing");
                return None;
            }

            for item in batch {
                match self.store.decode_for_hashing(item) {
                    Some(image) => hashes.push(item.with_hash(dhash64(&image))),
                    None => {
                        debug!(id = %item.id, "decode failed, skipping item");
                        result.failed_hash_count += 1;
                    }
                }
            }

            processed += batch.len();
            progress.send(ScanProgress::Hashing {
                processed,
                total: hash_total,
            });
        }

        if cancel.is_cancelled() {
            return None;
        }

        // Phase 3: cluster duplicates, then similar over the remainder
        let duplicate_groups = find_duplicate_groups(&hashes, self.config.duplicate_threshold);
        let duplicate_ids: HashSet<String> = duplicate_groups
            .iter()
            .flat_map(|group| group.items.iter().map(|item| item.id.clone()))
            .collect();
        let similar_groups = find_similar_groups(
            &hashes,
            &duplicate_ids,
            self.config.duplicate_threshold,
            self.config.similar_threshold,
        );

        info!(
            duplicate_groups = duplicate_groups.len(),
            similar_groups = similar_groups.len(),
            failed = result.failed_hash_count,
            "clustering complete"
        );

        // Phase 4: aggregate & publish
        result.duplicate_group_count = duplicate_groups.len();
        result.duplicate_item_count = duplicate_groups.iter().map(DuplicateGroup::len).sum();
        result.duplicate_size_bytes = duplicate_groups.iter().map(DuplicateGroup::total_size).sum();
        result.similar_group_count = similar_groups.len();
        result.similar_item_count = similar_groups.iter().map(SimilarGroup::len).sum();
        result.similar_size_bytes = similar_groups.iter().map(SimilarGroup::total_size).sum();

        Some(self.finish(
            ScanSnapshot {
                result,
                duplicate_groups,
                similar_groups,
                samples,
            },
            progress,
        ))
    }

    /// Swap in the new snapshot, then publish `Completed`. Retention happens
    /// first so the snapshot is readable the moment subscribers see the
    /// terminal state.
    fn finish(&self, snapshot: ScanSnapshot, progress: &ProgressSender) -> ScanSnapshot {
        *self.snapshot.lock().unwrap() = snapshot.clone();
        progress.send(ScanProgress::Completed(snapshot.result.clone()));
        snapshot
    }
}

/// Owns the scan lifecycle: one worker thread at a time, cooperative
/// cancellation, and the snapshot of the last completed scan.
pub struct LibraryScanner<S: MediaStore + 'static> {
    store: Arc<S>,
    orchestrator: Arc<ScanOrchestrator<S>>,
    active: Mutex<Option<CancelToken>>,
}

impl<S: MediaStore + 'static> LibraryScanner<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ScanConfig::default())
    }

    pub fn with_config(store: S, config: ScanConfig) -> Self {
        let store = Arc::new(store);
        Self {
            orchestrator: Arc::new(ScanOrchestrator::new(Arc::clone(&store), config)),
            store,
            active: Mutex::new(None),
        }
    }

    /// Start a scan on a background thread, cancelling any in-flight one.
    ///
    /// Returns the receiver for the ordered progress stream. The first state
    /// is `Scanning { 0, 0 }` so subscribers render immediately.
    pub fn start_scan(&self) -> ProgressReceiver {
        self.cancel_scan();

        let token = CancelToken::new();
        *self.active.lock().unwrap() = Some(token.clone());

        let (sender, receiver) = progress_channel();
        sender.send(ScanProgress::Scanning {
            processed: 0,
            total: 0,
        });

        let orchestrator = Arc::clone(&self.orchestrator);
        thread::spawn(move || {
            orchestrator.run(&sender, &token);
        });

        receiver
    }

    /// Cancel the in-flight scan, if any. The scan stops at its next batch
    /// boundary without publishing a terminal state.
    pub fn cancel_scan(&self) {
        if let Some(token) = self.active.lock().unwrap().take() {
            token.cancel();
        }
    }

    /// Cheap item count without a full scan
    pub fn quick_count(&self) -> usize {
        self.store.quick_count()
    }

    /// Duplicate groups from the last completed scan
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        self.orchestrator.latest_snapshot().duplicate_groups
    }

    /// Similar groups from the last completed scan
    pub fn similar_groups(&self) -> Vec<SimilarGroup> {
        self.orchestrator.latest_snapshot().similar_groups
    }

    /// Sample items for a category from the last completed scan
    pub fn samples(&self, category: MediaCategory) -> Vec<MediaItem> {
        self.orchestrator
            .latest_snapshot()
            .samples
            .remove(&category)
            .unwrap_or_default()
    }
}
