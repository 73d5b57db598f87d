//! # Selector Module
//!
//! Picks the "best" item of a group, the one worth keeping.
//!
//! Priority: highest resolution > not edited > favorite > newest. The
//! recency term is scaled down to a few hundredths so it only breaks
//! near-ties and never outweighs the other criteria.

use crate::core::hasher::ItemHash;

/// Select the index of the item to keep from a group.
///
/// Pure function of its inputs. Scores each item and returns the first
/// maximum encountered; a single-item group returns index 0 without scoring.
pub fn select_best_index(items: &[ItemHash]) -> usize {
    if items.len() < 2 {
        return 0;
    }

    let max_pixels = items.iter().map(ItemHash::pixel_count).max().unwrap_or(1);

    let mut best_index = 0;
    let mut best_score = f64::NEG_INFINITY;

    for (index, item) in items.iter().enumerate() {
        let mut score = 0.0;

        // Resolution, normalized against the sharpest group member (weight: 100)
        score += (item.pixel_count() as f64 / max_pixels.max(1) as f64) * 100.0;

        // Not-edited bonus (weight: 50)
        if !item.is_edited() {
            score += 50.0;
        }

        // Favorite bonus (weight: 30)
        if item.is_favorite {
            score += 30.0;
        }

        // Newer is better (tiny tiebreaker)
        if let Some(created_at) = item.created_at {
            score += created_at.timestamp() as f64 / 1_000_000_000.0;
        }

        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }

    best_index
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::core::hasher::SUBTYPE_EDITED;

    fn item(width: u32, height: u32) -> ItemHash {
        ItemHash {
            id: format!("{width}x{height}"),
            hash: 0,
            created_at: None,
            file_size: 1_000,
            pixel_width: width,
            pixel_height: height,
            is_favorite: false,
            media_subtypes: 0,
        }
    }

    #[test]
    fn single_item_returns_index_zero() {
        let items = vec![item(100, 100)];
        assert_eq!(select_best_index(&items), 0);
    }

    #[test]
    fn higher_resolution_wins() {
        let items = vec![item(10, 10), item(20, 20), item(15, 15)];
        assert_eq!(select_best_index(&items), 1);
    }

    #[test]
    fn resolution_ordering_is_scale_invariant() {
        // A has more pixels than B, all else equal: A never scores lower
        let small = vec![item(10, 10), item(20, 10)];
        let large = vec![item(1_000, 1_000), item(2_000, 1_000)];
        assert_eq!(select_best_index(&small), 1);
        assert_eq!(select_best_index(&large), 1);
    }

    #[test]
    fn unedited_beats_edited_at_equal_resolution() {
        let mut edited = item(20, 20);
        edited.media_subtypes = SUBTYPE_EDITED;
        let items = vec![edited, item(20, 20)];
        assert_eq!(select_best_index(&items), 1);
    }

    #[test]
    fn favorite_beats_plain_at_equal_resolution() {
        let mut favorite = item(20, 20);
        favorite.is_favorite = true;
        let items = vec![item(20, 20), favorite];
        assert_eq!(select_best_index(&items), 1);
    }

    #[test]
    fn recency_only_breaks_ties() {
        let mut old = item(20, 20);
        old.created_at = Some(Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap());
        let mut new = item(20, 20);
        new.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());

        // Equal otherwise: the newer item wins
        assert_eq!(select_best_index(&[old.clone(), new.clone()]), 1);

        // But recency never outweighs resolution
        let mut big_old = item(40, 40);
        big_old.created_at = old.created_at;
        assert_eq!(select_best_index(&[new, big_old]), 1);
    }

    #[test]
    fn favored_unedited_high_res_beats_merely_newer() {
        // Pixel counts [100, 400, 400]; second favorited and unedited;
        // third only newer
        let mut first = item(10, 10);
        first.created_at = Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let mut second = item(20, 20);
        second.is_favorite = true;
        second.created_at = Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());

        let mut third = item(20, 20);
        third.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        assert_eq!(select_best_index(&[first, second, third]), 1);
    }

    #[test]
    fn tie_goes_to_first_maximum() {
        let items = vec![item(20, 20), item(20, 20), item(20, 20)];
        assert_eq!(select_best_index(&items), 0);
    }
}
