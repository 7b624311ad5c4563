//! EXIF orientation codes and the pixel transform that makes an image upright.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// The eight EXIF orientation values.
///
/// Names describe the transform needed to display the stored pixels upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// 1 - already upright
    #[default]
    Normal,
    /// 2 - mirrored left to right
    FlipHorizontal,
    /// 3 - upside down
    Rotate180,
    /// 4 - mirrored top to bottom
    FlipVertical,
    /// 5 - mirrored along the top-left to bottom-right diagonal
    Transpose,
    /// 6 - needs a 90° clockwise turn
    Rotate90,
    /// 7 - mirrored along the top-right to bottom-left diagonal
    Transverse,
    /// 8 - needs a 90° counter-clockwise turn
    Rotate270,
}

impl Orientation {
    /// Map a raw EXIF orientation code. Codes outside 1-8 are rejected.
    pub fn from_exif(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Normal),
            2 => Some(Self::FlipHorizontal),
            3 => Some(Self::Rotate180),
            4 => Some(Self::FlipVertical),
            5 => Some(Self::Transpose),
            6 => Some(Self::Rotate90),
            7 => Some(Self::Transverse),
            8 => Some(Self::Rotate270),
            _ => None,
        }
    }

    /// The raw EXIF code for this orientation
    pub fn exif_code(self) -> u16 {
        match self {
            Self::Normal => 1,
            Self::FlipHorizontal => 2,
            Self::Rotate180 => 3,
            Self::FlipVertical => 4,
            Self::Transpose => 5,
            Self::Rotate90 => 6,
            Self::Transverse => 7,
            Self::Rotate270 => 8,
        }
    }

    /// Whether applying this orientation swaps width and height
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }

    /// Rotate/flip the pixels so the image is visually upright.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => image,
            Self::FlipHorizontal => image.fliph(),
            Self::Rotate180 => image.rotate180(),
            Self::FlipVertical => image.flipv(),
            Self::Transpose => image.rotate90().fliph(),
            Self::Rotate90 => image.rotate90(),
            Self::Transverse => image.rotate270().fliph(),
            Self::Rotate270 => image.rotate270(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// 2x1 image: red on the left, blue on the right
    fn two_pixel_image() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn exif_codes_round_trip() {
        for code in 1..=8u32 {
            let orientation = Orientation::from_exif(code).unwrap();
            assert_eq!(orientation.exif_code() as u32, code);
        }
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        assert_eq!(Orientation::from_exif(0), None);
        assert_eq!(Orientation::from_exif(9), None);
    }

    #[test]
    fn rotate90_turns_clockwise() {
        let rotated = Orientation::Rotate90.apply(two_pixel_image()).to_rgb8();
        assert_eq!(rotated.dimensions(), (1, 2));
        // Left pixel ends up on top after a clockwise turn
        assert_eq!(rotated.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(rotated.get_pixel(0, 1), &Rgb([0, 0, 255]));
    }

    #[test]
    fn rotate270_turns_counter_clockwise() {
        let rotated = Orientation::Rotate270.apply(two_pixel_image()).to_rgb8();
        assert_eq!(rotated.dimensions(), (1, 2));
        assert_eq!(rotated.get_pixel(0, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn flip_horizontal_mirrors() {
        let flipped = Orientation::FlipHorizontal.apply(two_pixel_image()).to_rgb8();
        assert_eq!(flipped.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(flipped.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn swapping_orientations_change_dimensions() {
        for code in 1..=8u32 {
            let orientation = Orientation::from_exif(code).unwrap();
            let applied = orientation.apply(two_pixel_image());
            let swapped = (applied.width(), applied.height()) == (1, 2);
            assert_eq!(swapped, orientation.swaps_dimensions(), "code {}", code);
        }
    }
}
