use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use super::sprite_filename;
use crate::error::SheetcutError;
use crate::grid::Rect;
use crate::pipeline::CutSheet;

pub const MANIFEST_FILENAME: &str = "sprites.json";

#[derive(Serialize)]
struct Manifest<'a> {
    meta: Meta,
    sheet: SheetInfo<'a>,
    sprites: Vec<ManifestSprite>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct SheetInfo<'a> {
    name: &'a str,
    size: Size,
    rows: usize,
    columns: usize,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestSprite {
    index: usize,
    image: String,
    row: usize,
    col: usize,
    size: Size,
    /// Cell rectangle in the sheet
    cell: Frame,
    /// Padded crop in sheet coordinates
    source_frame: Frame,
    /// Where the crop landed on the output canvas
    content_frame: Frame,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl From<Rect> for Frame {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            w: rect.width,
            h: rect.height,
        }
    }
}

/// Write the placement manifest for one sheet into `sheet_dir`
pub fn write_manifest(
    cut: &CutSheet,
    sheet_name: &str,
    sheet_size: (u32, u32),
    sheet_dir: &Path,
) -> Result<PathBuf> {
    let sprites = cut
        .sprites
        .iter()
        .map(|sprite| ManifestSprite {
            index: sprite.index,
            image: sprite_filename(sprite),
            row: sprite.row,
            col: sprite.col,
            size: Size {
                w: sprite.width(),
                h: sprite.height(),
            },
            cell: sprite.placement.cell.into(),
            source_frame: sprite.placement.crop_in_sheet().into(),
            content_frame: sprite.placement.content.into(),
        })
        .collect();

    let manifest = Manifest {
        meta: Meta {
            app: "sheetcut",
            version: env!("CARGO_PKG_VERSION"),
        },
        sheet: SheetInfo {
            name: sheet_name,
            size: Size {
                w: sheet_size.0,
                h: sheet_size.1,
            },
            rows: cut.layout.row_count(),
            columns: cut.layout.column_count(),
        },
        sprites,
    };

    let path = sheet_dir.join(MANIFEST_FILENAME);
    let content = serde_json::to_string_pretty(&manifest)?;

    fs::write(&path, content).map_err(|e| SheetcutError::OutputWrite {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}
