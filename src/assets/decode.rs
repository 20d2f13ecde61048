use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{TitlerError, TitlerResult};

/// Decoded raster image in straight (non-premultiplied) RGBA8 form, plus the
/// container format it was decoded from.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major straight RGBA8.
    pub rgba8: Arc<Vec<u8>>,
    /// Container format detected from the file path.
    pub format: image::ImageFormat,
}

/// Decode an image file into straight RGBA8, remembering its format.
///
/// Any read or decode problem is surfaced as [`TitlerError::UnreadableImage`] so
/// batch callers can recover per file.
pub fn decode_source(path: &Path) -> TitlerResult<SourceImage> {
    let format = image::ImageFormat::from_path(path).map_err(|e| {
        TitlerError::unreadable_image(format!("'{}': {e}", path.display()))
    })?;
    let bytes = std::fs::read(path).map_err(|e| {
        TitlerError::unreadable_image(format!("'{}': {e}", path.display()))
    })?;
    let dyn_img = image::load_from_memory_with_format(&bytes, format).map_err(|e| {
        TitlerError::unreadable_image(format!("'{}': {e}", path.display()))
    })?;

    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(SourceImage {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
        format,
    })
}

/// Convert straight RGBA8 to premultiplied RGBA8 in place.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Convert premultiplied RGBA8 back to straight RGBA8 in place.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = (((px[0] as u32) * 255 + a / 2) / a).min(255) as u8;
        px[1] = (((px[1] as u32) * 255 + a / 2) / a).min(255) as u8;
        px[2] = (((px[2] as u32) * 255 + a / 2) / a).min(255) as u8;
    }
}
