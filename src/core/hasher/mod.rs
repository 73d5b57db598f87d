//! # Hasher Module
//!
//! Computes 64-bit difference hashes (dHash) for perceptual similarity.
//!
//! dHash works by:
//! 1. Resizing the image to a 9x8 grayscale raster
//! 2. Comparing each pixel to the one on its right (8 comparisons per row)
//! 3. If the left pixel is brighter, set the bit to 1, else 0
//! 4. Packing the 64 bits row-major, least-significant bit first
//!
//! This captures the relative gradient of brightness changes, so the hash is
//! tolerant of recompression and resizing. The clustering stage depends on
//! this exact bit layout; the resampling filter is deliberately fast and
//! low-quality because only the 9x8 geometry matters.

use chrono::{DateTime, Utc};
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Width of the downsampled raster (one extra column for the comparisons)
pub const HASH_IMAGE_WIDTH: u32 = 9;
/// Height of the downsampled raster
pub const HASH_IMAGE_HEIGHT: u32 = 8;

/// Platform subtype bit marking a screenshot
pub const SUBTYPE_SCREENSHOT: u32 = 1 << 2;
/// Platform subtype bit marking an edited photo
pub const SUBTYPE_EDITED: u32 = 0x10;

/// Compute the 64-bit dHash of a decoded image.
///
/// Returns 0 for a degenerate raster (zero width or height); callers treat
/// that item as a failed hash, not as an error.
pub fn dhash64(image: &DynamicImage) -> u64 {
    if image.width() == 0 || image.height() == 0 {
        return 0;
    }

    let gray = image
        .resize_exact(HASH_IMAGE_WIDTH, HASH_IMAGE_HEIGHT, FilterType::Nearest)
        .into_luma8();

    let mut hash: u64 = 0;
    let mut bit: u32 = 0;
    for y in 0..HASH_IMAGE_HEIGHT {
        for x in 0..(HASH_IMAGE_WIDTH - 1) {
            let left = gray.get_pixel(x, y)[0];
            let right = gray.get_pixel(x + 1, y)[0];
            if left > right {
                hash |= 1 << bit;
            }
            bit += 1;
        }
    }

    hash
}

/// Hamming distance between two hashes: the number of differing bits.
///
/// Symmetric, bounded to [0, 64], and 0 for identical hashes. Compiles to a
/// single popcount instruction.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Perceptual hash plus the metadata needed for best-result selection.
///
/// Produced once per item per scan and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemHash {
    /// Stable identifier of the media item in its store
    pub id: String,
    /// 64-bit dHash
    pub hash: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub file_size: u64,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub is_favorite: bool,
    /// Raw platform subtype bitmask
    pub media_subtypes: u32,
}

impl ItemHash {
    /// Total pixel count for resolution comparison
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.pixel_width) * u64::from(self.pixel_height)
    }

    /// Whether the item has been edited.
    ///
    /// True iff the edit subtype bit is set and the screenshot bit is not.
    pub fn is_edited(&self) -> bool {
        self.media_subtypes & SUBTYPE_SCREENSHOT == 0 && self.media_subtypes & SUBTYPE_EDITED != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};

    fn solid_image(value: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |_, _| Luma([value]));
        DynamicImage::ImageLuma8(img)
    }

    fn left_to_right_gradient() -> DynamicImage {
        // Left is dark, right is bright: every comparison yields left < right
        let img = ImageBuffer::from_fn(90, 80, |x, _| {
            let brightness = (x * 255 / 89) as u8;
            Rgb([brightness, brightness, brightness])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn right_to_left_gradient() -> DynamicImage {
        // Right is dark, left is bright: every comparison yields left > right
        let img = ImageBuffer::from_fn(90, 80, |x, _| {
            let brightness = ((89 - x) * 255 / 89) as u8;
            Rgb([brightness, brightness, brightness])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn item(id: &str, subtypes: u32) -> ItemHash {
        ItemHash {
            id: id.to_string(),
            hash: 0,
            created_at: None,
            file_size: 0,
            pixel_width: 100,
            pixel_height: 100,
            is_favorite: false,
            media_subtypes: subtypes,
        }
    }

    #[test]
    fn identical_images_produce_identical_hash() {
        let image = left_to_right_gradient();
        assert_eq!(dhash64(&image), dhash64(&image));
    }

    #[test]
    fn solid_image_hashes_to_zero() {
        // No pixel is brighter than its neighbor, so no bit is set
        assert_eq!(dhash64(&solid_image(128)), 0);
    }

    #[test]
    fn descending_gradient_sets_all_bits() {
        // Every left pixel is strictly brighter than its right neighbor
        assert_eq!(dhash64(&right_to_left_gradient()), u64::MAX);
    }

    #[test]
    fn opposite_gradients_are_maximally_distant() {
        let a = dhash64(&left_to_right_gradient());
        let b = dhash64(&right_to_left_gradient());
        assert_eq!(hamming_distance(a, b), 64);
    }

    #[test]
    fn hamming_distance_is_symmetric_and_bounded() {
        let pairs = [(0u64, 0u64), (0, 1), (0xFF, 0x00), (u64::MAX, 0), (42, 7)];
        for (a, b) in pairs {
            assert_eq!(hamming_distance(a, b), hamming_distance(b, a));
            assert!(hamming_distance(a, b) <= 64);
        }
        assert_eq!(hamming_distance(0xDEAD_BEEF, 0xDEAD_BEEF), 0);
    }

    #[test]
    fn edited_requires_edit_bit_without_screenshot_bit() {
        assert!(item("a", SUBTYPE_EDITED).is_edited());
        assert!(!item("b", SUBTYPE_EDITED | SUBTYPE_SCREENSHOT).is_edited());
        assert!(!item("c", SUBTYPE_SCREENSHOT).is_edited());
        assert!(!item("d", 0).is_edited());
    }

    #[test]
    fn pixel_count_multiplies_dimensions() {
        let mut hash = item("a", 0);
        hash.pixel_width = 4000;
        hash.pixel_height = 3000;
        assert_eq!(hash.pixel_count(), 12_000_000);
    }
}
