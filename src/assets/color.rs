use std::collections::HashMap;

use crate::assets::decode::SourceImage;
use crate::foundation::core::Rgba8;

/// Most frequent non-transparent color in an image, or `None` when every pixel
/// is fully transparent.
///
/// Ties are broken by channel value (lexicographic over r, g, b, a), so the
/// result is deterministic for a fixed input regardless of pixel order.
pub fn dominant_opaque_color(image: &SourceImage) -> Option<Rgba8> {
    let mut histogram: HashMap<Rgba8, u64> = HashMap::new();
    for px in image.rgba8.chunks_exact(4) {
        if px[3] == 0 {
            continue;
        }
        *histogram
            .entry(Rgba8::new(px[0], px[1], px[2], px[3]))
            .or_insert(0) += 1;
    }

    histogram
        .into_iter()
        .max_by_key(|&(color, count)| (count, color))
        .map(|(color, _)| color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn image_from_pixels(pixels: &[[u8; 4]]) -> SourceImage {
        let mut bytes = Vec::with_capacity(pixels.len() * 4);
        for px in pixels {
            bytes.extend_from_slice(px);
        }
        SourceImage {
            width: pixels.len() as u32,
            height: 1,
            rgba8: Arc::new(bytes),
            format: image::ImageFormat::Png,
        }
    }

    #[test]
    fn picks_most_frequent_color() {
        let img = image_from_pixels(&[
            [201, 2, 41, 255],
            [201, 2, 41, 255],
            [0, 164, 246, 255],
        ]);
        assert_eq!(
            dominant_opaque_color(&img),
            Some(Rgba8::new(201, 2, 41, 255))
        );
    }

    #[test]
    fn ignores_fully_transparent_pixels() {
        let img = image_from_pixels(&[
            [255, 255, 255, 0],
            [255, 255, 255, 0],
            [255, 255, 255, 0],
            [0, 164, 246, 255],
        ]);
        assert_eq!(
            dominant_opaque_color(&img),
            Some(Rgba8::new(0, 164, 246, 255))
        );
    }

    #[test]
    fn all_transparent_yields_none() {
        let img = image_from_pixels(&[[1, 2, 3, 0], [4, 5, 6, 0]]);
        assert_eq!(dominant_opaque_color(&img), None);
    }

    #[test]
    fn tie_break_is_deterministic() {
        let img = image_from_pixels(&[[10, 0, 0, 255], [20, 0, 0, 255]]);
        // Equal counts resolve to the lexicographically larger color.
        assert_eq!(
            dominant_opaque_color(&img),
            Some(Rgba8::new(20, 0, 0, 255))
        );
    }
}
