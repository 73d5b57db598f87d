//! Progress and result types published by the scan pipeline.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a library scan.
///
/// Exactly one state is active at a time. Transitions only move forward
/// (idle → scanning → hashing → completed | failed); starting a new scan
/// cancels the previous one and begins again from `Idle`. A cancelled scan
/// emits no terminal state at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScanProgress {
    /// No scan running
    Idle,
    /// Enumerating and categorizing the library
    Scanning { processed: usize, total: usize },
    /// Computing perceptual hashes
    Hashing { processed: usize, total: usize },
    /// Scan finished with a result
    Completed(ScanResult),
    /// Scan aborted with an error message
    Failed(String),
}

impl ScanProgress {
    /// Progress fraction from 0.0 to 1.0 for the current phase
    pub fn fraction(&self) -> f64 {
        match self {
            ScanProgress::Scanning { processed, total }
            | ScanProgress::Hashing { processed, total } => {
                if *total == 0 {
                    0.0
                } else {
                    *processed as f64 / *total as f64
                }
            }
            ScanProgress::Completed(_) => 1.0,
            _ => 0.0,
        }
    }

    /// Whether a scan is currently in progress
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ScanProgress::Scanning { .. } | ScanProgress::Hashing { .. }
        )
    }

    /// Whether the scan reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanProgress::Completed(_) | ScanProgress::Failed(_))
    }
}

/// Aggregate output of a completed library scan.
///
/// Screenshots are a subset of photos, so they are counted in both the
/// screenshot and photo totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub total_items: usize,
    pub total_photos: usize,
    pub total_videos: usize,
    pub total_screenshots: usize,
    pub total_size_bytes: u64,
    pub photos_size_bytes: u64,
    pub videos_size_bytes: u64,
    pub screenshots_size_bytes: u64,

    pub duplicate_group_count: usize,
    pub duplicate_item_count: usize,
    pub duplicate_size_bytes: u64,
    pub similar_group_count: usize,
    pub similar_item_count: usize,
    pub similar_size_bytes: u64,

    /// Photos that could not be decoded for hashing
    pub failed_hash_count: usize,
}

impl ScanResult {
    /// All-zero result, published when the library is empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// Photos that are neither screenshots nor part of any group
    pub fn other_photo_count(&self) -> usize {
        self.total_photos.saturating_sub(self.total_screenshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_zero_when_total_is_zero() {
        let progress = ScanProgress::Scanning {
            processed: 0,
            total: 0,
        };
        assert_eq!(progress.fraction(), 0.0);
    }

    #[test]
    fn fraction_reflects_phase_progress() {
        let progress = ScanProgress::Hashing {
            processed: 25,
            total: 100,
        };
        assert_eq!(progress.fraction(), 0.25);
    }

    #[test]
    fn completed_is_terminal_and_full() {
        let progress = ScanProgress::Completed(ScanResult::empty());
        assert!(progress.is_terminal());
        assert!(!progress.is_active());
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn progress_is_serializable() {
        let progress = ScanProgress::Scanning {
            processed: 300,
            total: 1200,
        };
        let json = serde_json::to_string(&progress).unwrap();
        let back: ScanProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(progress, back);
    }

    #[test]
    fn empty_result_is_all_zero() {
        let result = ScanResult::empty();
        assert_eq!(result.total_items, 0);
        assert_eq!(result.duplicate_group_count, 0);
        assert_eq!(result.total_size_bytes, 0);
    }
}
