use super::{GridLayout, Rect};
use crate::sprite::PixelBuffer;

/// One grid cell cut out of a sheet
#[derive(Debug, Clone)]
pub struct Cell {
    /// Row-major position, `row * columns + col`
    pub index: usize,
    pub row: usize,
    pub col: usize,
    /// Where the cell sits in the sheet
    pub rect: Rect,
    pub buffer: PixelBuffer,
}

/// Slice `sheet` into its cells in reading order (left to right, then top to bottom).
pub fn split(sheet: &PixelBuffer, layout: &GridLayout) -> Vec<Cell> {
    debug_assert!(
        !layout.rows.is_empty() && !layout.columns.is_empty(),
        "grid layout without bands"
    );

    let columns = layout.column_count();
    let mut cells = Vec::with_capacity(layout.cell_count());

    for row in 0..layout.row_count() {
        for col in 0..columns {
            let rect = layout.cell_rect(row, col);
            cells.push(Cell {
                index: row * columns + col,
                row,
                col,
                rect,
                buffer: sheet.sub_buffer(rect.x, rect.y, rect.width, rect.height),
            });
        }
    }

    cells
}
