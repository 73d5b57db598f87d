//! # Clusterer Module
//!
//! Groups hashed items into clusters of perceptually close photos.
//!
//! ## How It Works
//! 1. Sort a working index array by ascending hash value so that items
//!    likely to be close land next to each other
//! 2. Compare each sorted position against the next `window` positions only,
//!    unioning pairs whose Hamming distance falls within the band
//! 3. Collect union-find roots into groups and discard singletons
//!
//! Membership is transitive: if A~B and B~C are in band, {A, B, C} is one
//! group even when A~C is not. The bounded window keeps the cost at
//! O(n · window) instead of O(n²); pairs that are in band but far apart in
//! sorted hash order can be missed, which is an accepted trade-off for
//! libraries of tens of thousands of items.
//!
//! ## Distance Bands
//! | Band           | Distance | Pass       |
//! |----------------|----------|------------|
//! | Duplicate      | 0..=10   | first      |
//! | Similar        | 11..=20  | second, over items not already in a duplicate group |

mod union_find;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::hasher::{hamming_distance, ItemHash};
use crate::core::selector::select_best_index;
use union_find::UnionFind;

/// Sliding-window width for the duplicate pass
pub const DUPLICATE_WINDOW: usize = 200;
/// Sliding-window width for the similar pass
pub const SIMILAR_WINDOW: usize = 300;

/// Default Hamming distance at or below which items are duplicates
pub const DEFAULT_DUPLICATE_THRESHOLD: u32 = 10;
/// Default Hamming distance at or below which items are similar
pub const DEFAULT_SIMILAR_THRESHOLD: u32 = 20;

/// Inclusive distance range for one clustering pass.
#[derive(Debug, Clone, Copy)]
pub struct DistanceBand {
    /// Distances must be strictly greater than this, if set
    low_exclusive: Option<u32>,
    /// Distances must be at most this
    high_inclusive: u32,
}

impl DistanceBand {
    /// Band [0, high]: the duplicate pass
    pub fn up_to(high_inclusive: u32) -> Self {
        Self {
            low_exclusive: None,
            high_inclusive,
        }
    }

    /// Band (low, high]: the similar pass
    pub fn between(low_exclusive: u32, high_inclusive: u32) -> Self {
        Self {
            low_exclusive: Some(low_exclusive),
            high_inclusive,
        }
    }

    fn contains(&self, distance: u32) -> bool {
        self.low_exclusive.map_or(true, |low| distance > low) && distance <= self.high_inclusive
    }
}

/// A group of 2+ items whose hashes fall within the duplicate band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub id: Uuid,
    /// Members in clustering insertion order
    pub items: Vec<ItemHash>,
    /// Index into `items` of the member recommended to keep
    pub best_index: usize,
}

/// A group of 2+ items whose hashes fall within the similar band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarGroup {
    pub id: Uuid,
    /// Members in clustering insertion order
    pub items: Vec<ItemHash>,
    /// Index into `items` of the member recommended to keep
    pub best_index: usize,
    /// Truncated mean pairwise Hamming distance across the group
    pub average_distance: u32,
}

macro_rules! group_accessors {
    ($ty:ident) => {
        impl $ty {
            /// Number of items in the group
            pub fn len(&self) -> usize {
                self.items.len()
            }

            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            /// Total size of all items in the group
            pub fn total_size(&self) -> u64 {
                self.items.iter().map(|item| item.file_size).sum()
            }

            /// Bytes saved by deleting everything except the best result
            pub fn potential_savings(&self) -> u64 {
                self.items
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| *index != self.best_index)
                    .map(|(_, item)| item.file_size)
                    .sum()
            }
        }

        // Identity semantics: groups are equal iff their ids are, so the
        // presentation layer can diff lists cheaply.
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}
    };
}

group_accessors!(DuplicateGroup);
group_accessors!(SimilarGroup);

/// Partition `items` into transitive clusters over the given band.
///
/// Returns groups of original indices, each of size >= 2, members in
/// ascending index order.
fn cluster_indices(items: &[ItemHash], band: DistanceBand, window: usize) -> Vec<Vec<usize>> {
    let count = items.len();
    if count < 2 {
        return Vec::new();
    }

    let mut uf = UnionFind::new(count);

    // Sort a working index array by hash value; close hashes tend to be
    // numerically close, so a bounded window catches most in-band pairs.
    let mut sorted: Vec<usize> = (0..count).collect();
    sorted.sort_by_key(|&index| items[index].hash);

    for i in 0..count - 1 {
        let upper = (i + window).min(count);
        for j in i + 1..upper {
            let distance = hamming_distance(items[sorted[i]].hash, items[sorted[j]].hash);
            if band.contains(distance) {
                uf.union(sorted[i], sorted[j]);
            }
        }
    }

    let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    for index in 0..count {
        let root = uf.find(index);
        by_root.entry(root).or_default().push(index);
    }

    by_root
        .into_values()
        .filter(|members| members.len() >= 2)
        .collect()
}

/// Truncated mean Hamming distance over all unordered pairs in a group.
fn mean_pairwise_distance(items: &[ItemHash]) -> u32 {
    let mut total: u64 = 0;
    let mut pairs: u64 = 0;
    for a in 0..items.len() {
        for b in a + 1..items.len() {
            total += u64::from(hamming_distance(items[a].hash, items[b].hash));
            pairs += 1;
        }
    }
    if pairs > 0 {
        (total / pairs) as u32
    } else {
        0
    }
}

/// Find all duplicate groups: Hamming distance within [0, threshold].
///
/// Groups are sorted by descending total byte size.
pub fn find_duplicate_groups(items: &[ItemHash], threshold: u32) -> Vec<DuplicateGroup> {
    let band = DistanceBand::up_to(threshold);
    let mut groups: Vec<DuplicateGroup> = cluster_indices(items, band, DUPLICATE_WINDOW)
        .into_iter()
        .map(|indices| {
            let members: Vec<ItemHash> =
                indices.iter().map(|&index| items[index].clone()).collect();
            let best_index = select_best_index(&members);
            DuplicateGroup {
                id: Uuid::new_v4(),
                items: members,
                best_index,
            }
        })
        .collect();

    groups.sort_by(|a, b| b.total_size().cmp(&a.total_size()));
    groups
}

/// Find all similar groups: Hamming distance within (duplicate_threshold,
/// similar_threshold].
///
/// Items whose ids appear in `excluding` (members of duplicate groups) are
/// removed from consideration first. Groups are sorted by descending total
/// byte size.
pub fn find_similar_groups(
    items: &[ItemHash],
    excluding: &HashSet<String>,
    duplicate_threshold: u32,
    similar_threshold: u32,
) -> Vec<SimilarGroup> {
    let candidates: Vec<ItemHash> = items
        .iter()
        .filter(|item| !excluding.contains(&item.id))
        .cloned()
        .collect();

    let band = DistanceBand::between(duplicate_threshold, similar_threshold);
    let mut groups: Vec<SimilarGroup> = cluster_indices(&candidates, band, SIMILAR_WINDOW)
        .into_iter()
        .map(|indices| {
            let members: Vec<ItemHash> = indices
                .iter()
                .map(|&index| candidates[index].clone())
                .collect();
            let best_index = select_best_index(&members);
            let average_distance = mean_pairwise_distance(&members);
            SimilarGroup {
                id: Uuid::new_v4(),
                items: members,
                best_index,
                average_distance,
            }
        })
        .collect();

    groups.sort_by(|a, b| b.total_size().cmp(&a.total_size()));
    groups
}
