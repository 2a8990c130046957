use log::{debug, info};
use rayon::prelude::*;

use crate::background::remove_background;
use crate::config::CutConfig;
use crate::error::SheetcutError;
use crate::grid::{self, Cell, GridLayout};
use crate::sprite::{PixelBuffer, SourceSheet, Sprite, crop_and_resize};

/// Sprites cut from one sheet, with the layout they came from
#[derive(Debug, Clone)]
pub struct CutSheet {
    pub layout: GridLayout,
    /// Indexed `0..n` in reading order
    pub sprites: Vec<Sprite>,
}

/// Result of processing one sheet in a batch
#[derive(Debug)]
pub struct SheetOutcome<'a> {
    pub sheet: &'a SourceSheet,
    pub result: Result<CutSheet, SheetcutError>,
}

/// Cut one sheet into sprites.
///
/// Sprites come back in row-major grid order with `index == row * columns +
/// col`. Cells are independent and processed in parallel; the output order
/// does not depend on scheduling.
pub fn process(sheet: &PixelBuffer, config: &CutConfig) -> Result<Vec<Sprite>, SheetcutError> {
    cut_sheet(sheet, config).map(|cut| cut.sprites)
}

/// Like [`process`], also returning the detected layout.
pub fn cut_sheet(sheet: &PixelBuffer, config: &CutConfig) -> Result<CutSheet, SheetcutError> {
    if sheet.is_empty() {
        return Err(SheetcutError::InvalidBuffer {
            width: sheet.width(),
            height: sheet.height(),
        });
    }

    let layout = grid::detect(sheet, config);
    debug!(
        "Detected {}x{} grid",
        layout.row_count(),
        layout.column_count()
    );

    let cells = grid::split(sheet, &layout);
    let sprites = cells
        .par_iter()
        .map(|cell| cut_cell(cell, config))
        .collect();

    Ok(CutSheet { layout, sprites })
}

fn cut_cell(cell: &Cell, config: &CutConfig) -> Sprite {
    let mask = remove_background(&cell.buffer, config);
    let sprite = crop_and_resize(cell, &mask, config);
    debug!(
        "Cell {} ({}, {}): {} opaque pixel(s), crop {}x{}",
        cell.index,
        cell.row,
        cell.col,
        mask.opaque_count(),
        sprite.placement.crop.width,
        sprite.placement.crop.height
    );
    sprite
}

/// Cut many sheets in parallel.
///
/// Every sheet gets its own outcome, in input order; a failing sheet does
/// not affect the others.
pub fn process_batch<'a>(sheets: &'a [SourceSheet], config: &CutConfig) -> Vec<SheetOutcome<'a>> {
    let outcomes: Vec<SheetOutcome<'a>> = sheets
        .par_iter()
        .map(|sheet| SheetOutcome {
            sheet,
            result: cut_sheet(&sheet.buffer, config),
        })
        .collect();

    let sprites: usize = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|cut| cut.sprites.len())
        .sum();
    info!("Cut {} sprite(s) from {} sheet(s)", sprites, sheets.len());

    outcomes
}
