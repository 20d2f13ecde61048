//! Writing finished title cards to disk.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::compose::engine::ComposedImage;
use crate::foundation::error::{TitlerError, TitlerResult};

/// Derived output file name for a composed card.
///
/// The title is lowercased and its whitespace collapsed to hyphens, then
/// suffixed with `-featured-image` and the extension matching the source
/// format, e.g. `How to Loop in Python` -> `how-to-loop-in-python-featured-image.png`.
pub fn output_file_name(title: &str, format: image::ImageFormat) -> String {
    let slug: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    // Titles made of pure punctuation filter down to hyphens only.
    let slug = if slug.chars().any(|c| c.is_ascii_alphanumeric()) {
        &slug
    } else {
        "untitled"
    };
    format!("{slug}-featured-image.{}", format_extension(format))
}

fn format_extension(format: image::ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("png")
}

/// Monotonic tag appended to temp file names so concurrent writers in the
/// same directory never share one.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Save a composed card into `dest_dir`, never overwriting existing files.
///
/// The file name is derived from the card's title; when it is already taken,
/// a numeric suffix is appended before the extension (`...-featured-image-1.png`,
/// `-2`, ...). The name is claimed with an exclusive create so concurrent
/// writers (batch workers included) each get a distinct path, and the bytes
/// are written to a uniquely named temporary sibling and renamed over the
/// claimed file, so a failed write never leaves a truncated output. Returns
/// the path the card was written to.
pub fn save_copy(image: &ComposedImage, dest_dir: &Path) -> TitlerResult<PathBuf> {
    if !dest_dir.is_dir() {
        return Err(TitlerError::write_failure(format!(
            "output directory '{}' does not exist",
            dest_dir.display()
        )));
    }

    let bytes = encode(image)?;
    let path = claim_path(dest_dir, &image.title, image.format)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("featured-image");
    let tmp = dest_dir.join(format!(
        ".{file_name}.{}.{}.tmp",
        std::process::id(),
        TMP_SEQ.fetch_add(1, Ordering::Relaxed)
    ));

    std::fs::write(&tmp, &bytes).map_err(|e| {
        let _ = std::fs::remove_file(&path);
        TitlerError::write_failure(format!("writing '{}': {e}", tmp.display()))
    })?;
    std::fs::rename(&tmp, &path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        let _ = std::fs::remove_file(&path);
        TitlerError::write_failure(format!("renaming into '{}': {e}", path.display()))
    })?;

    tracing::info!(path = %path.display(), "saved title card");
    Ok(path)
}

/// Reserve the first free derived path in `dest_dir` by creating it
/// exclusively. The empty placeholder is replaced by the rename in
/// [`save_copy`]; claiming it up front keeps two writers with the same title
/// from ever agreeing on one name.
fn claim_path(dest_dir: &Path, title: &str, format: image::ImageFormat) -> TitlerResult<PathBuf> {
    let base = output_file_name(title, format);
    let ext = format_extension(format);
    let stem = base
        .strip_suffix(&format!(".{ext}"))
        .unwrap_or(&base)
        .to_string();

    let mut n = 0u32;
    loop {
        let candidate = if n == 0 {
            dest_dir.join(&base)
        } else {
            dest_dir.join(format!("{stem}-{n}.{ext}"))
        };
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => {
                return Err(TitlerError::write_failure(format!(
                    "claiming '{}': {e}",
                    candidate.display()
                )));
            }
        }
    }
}

fn encode(image: &ComposedImage) -> TitlerResult<Vec<u8>> {
    let buf = image::RgbaImage::from_raw(image.width, image.height, image.rgba8.clone())
        .ok_or_else(|| TitlerError::write_failure("composed pixel buffer has wrong length"))?;
    let dynamic = image::DynamicImage::ImageRgba8(buf);
    // JPEG has no alpha channel.
    let dynamic = match image.format {
        image::ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(dynamic.to_rgb8()),
        _ => dynamic,
    };

    let mut bytes = Vec::new();
    dynamic
        .write_to(&mut Cursor::new(&mut bytes), image.format)
        .map_err(|e| TitlerError::write_failure(format!("encoding output image: {e}")))?;
    Ok(bytes)
}
