use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{TitlerError, TitlerResult};

/// Default banner text size in pixels.
pub const DEFAULT_FONT_SIZE_PX: f32 = 114.0;

/// Font selection for banner text: an explicit file, or the first usable
/// system font discovered at compose time.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Path to a `.ttf`/`.otf` file; `None` means discover a system default.
    pub source: Option<PathBuf>,
    /// Glyph size in pixels.
    pub size_px: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            source: None,
            size_px: DEFAULT_FONT_SIZE_PX,
        }
    }
}

impl FontSpec {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size_px: f32) -> Self {
        self.size_px = size_px;
        self
    }

    /// Read the raw font bytes, resolving the system default when no explicit
    /// path was given.
    pub fn load_bytes(&self) -> TitlerResult<Vec<u8>> {
        let path = match &self.source {
            Some(p) => p.clone(),
            None => discover_default_font().ok_or_else(|| {
                TitlerError::validation(
                    "no font specified and no system .ttf/.otf font could be discovered",
                )
            })?,
        };
        std::fs::read(&path)
            .with_context(|| format!("read font bytes from '{}'", path.display()))
            .map_err(TitlerError::from)
    }
}

/// Locate a usable font file in the standard system font directories.
///
/// Directory entries are visited in sorted order so repeated runs on the same
/// machine resolve the same file.
pub fn discover_default_font() -> Option<PathBuf> {
    let mut roots: Vec<PathBuf> = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        roots.push(Path::new(&home).join(".local/share/fonts"));
        roots.push(Path::new(&home).join(".fonts"));
    }

    roots.iter().find_map(|root| find_font_file(root, 0))
}

fn find_font_file(dir: &Path, depth: u32) -> Option<PathBuf> {
    // Font trees are shallow; cap the walk so a symlink cycle cannot hang us.
    if depth > 4 {
        return None;
    }
    let rd = std::fs::read_dir(dir).ok()?;

    let mut entries: Vec<PathBuf> = rd.flatten().map(|e| e.path()).collect();
    entries.sort();

    for path in &entries {
        if path.is_file()
            && let Some(ext) = path.extension().and_then(|s| s.to_str())
        {
            let ext = ext.to_ascii_lowercase();
            if ext == "ttf" || ext == "otf" {
                return Some(path.clone());
            }
        }
    }
    for path in &entries {
        if path.is_dir()
            && let Some(found) = find_font_file(path, depth + 1)
        {
            return Some(found);
        }
    }
    None
}
