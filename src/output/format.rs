use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{ImageFormat, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::SheetcutError;
use crate::sprite::Sprite;

/// Encode an RGBA image as PNG, optionally recompressing with oxipng
pub fn encode_png(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<Vec<u8>> {
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| SheetcutError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let Some(level) = compress else {
        return Ok(png_data.into_inner());
    };

    let opts = match level {
        CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
        CompressionLevel::Max => oxipng::Options::max_compression(),
    };
    let optimized = oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
        SheetcutError::PngCompress {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    Ok(optimized)
}

/// File a sprite is written to inside its sheet directory
pub fn sprite_filename(sprite: &Sprite) -> String {
    format!("{}.png", sprite.index)
}

/// Write every sprite of a sheet as `<sheet_dir>/<index>.png`.
///
/// Creates `sheet_dir` if needed and returns the written paths in sprite order.
pub fn save_sprites(
    sprites: &[Sprite],
    sheet_dir: &Path,
    compress: Option<CompressionLevel>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(sheet_dir).map_err(|e| SheetcutError::OutputWrite {
        path: sheet_dir.to_path_buf(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(sprites.len());
    for sprite in sprites {
        let path = sheet_dir.join(sprite_filename(sprite));
        let data = encode_png(&sprite.image, &path, compress)?;
        fs::write(&path, data).map_err(|e| SheetcutError::OutputWrite {
            path: path.clone(),
            source: e,
        })?;
        written.push(path);
    }

    Ok(written)
}
