use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageReader;
use log::{debug, info, warn};
use rayon::prelude::*;

use super::PixelBuffer;
use crate::error::SheetcutError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// A decoded sheet and the name its sprites are grouped under
#[derive(Debug, Clone)]
pub struct SourceSheet {
    pub path: PathBuf,
    /// File stem; names the output subdirectory
    pub name: String,
    pub buffer: PixelBuffer,
}

/// Find the sheets named by `inputs` (files, or directories scanned one
/// level deep) in path order.
pub fn collect_sheet_paths(inputs: &[impl AsRef<Path>]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(SheetcutError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(path.to_path_buf());
            } else {
                warn!("Skipping unsupported file {}", path.display());
            }
        } else if path.is_dir() {
            let mut found = images_in_directory(path)?;
            if found.is_empty() {
                warn!("No images found in {}", path.display());
            }
            found.sort();
            paths.extend(found);
        }
    }

    Ok(paths)
}

fn images_in_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            found.push(path);
        }
    }

    Ok(found)
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode every sheet named by `inputs`.
///
/// Each entry is that sheet's own result, in input order, so one unreadable
/// file does not stop the others. Fails only when no sheet is found at all.
pub fn load_sheets(inputs: &[impl AsRef<Path>]) -> Result<Vec<Result<SourceSheet>>> {
    let paths = collect_sheet_paths(inputs)?;
    if paths.is_empty() {
        return Err(SheetcutError::NoImages.into());
    }

    info!("Loading {} sheet(s)...", paths.len());

    Ok(paths.par_iter().map(|path| load_sheet(path)).collect())
}

/// Decode a single sheet.
pub fn load_sheet(path: &Path) -> Result<SourceSheet> {
    let image = ImageReader::open(path)
        .map_err(|e| SheetcutError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| SheetcutError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| SheetcutError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet")
        .to_string();

    let buffer = PixelBuffer::from_dynamic(image);
    debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        buffer.width(),
        buffer.height(),
        buffer.channels()
    );

    Ok(SourceSheet {
        path: path.to_path_buf(),
        name,
        buffer,
    })
}
