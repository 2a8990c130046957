use serde::Serialize;

use super::Rect;

/// A run of rows or columns that forms one grid line, `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Band {
    pub start: u32,
    pub end: u32,
}

impl Band {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start < end, "band must have positive width");
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Row and column bands of a sheet; cells are their cross product.
///
/// Bands on each axis are strictly increasing and never overlap. Separator
/// pixels between bands belong to no cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub rows: Vec<Band>,
    pub columns: Vec<Band>,
}

impl GridLayout {
    pub fn new(rows: Vec<Band>, columns: Vec<Band>) -> Self {
        debug_assert!(is_ordered(&rows) && is_ordered(&columns));
        Self { rows, columns }
    }

    /// The whole image as a single cell; both dimensions must be non-zero.
    pub fn single(width: u32, height: u32) -> Self {
        Self::new(vec![Band::new(0, height)], vec![Band::new(0, width)])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.columns.len()
    }

    /// Sheet rectangle of the cell at (`row`, `col`)
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let r = self.rows[row];
        let c = self.columns[col];
        Rect::new(c.start, r.start, c.len(), r.len())
    }
}

fn is_ordered(bands: &[Band]) -> bool {
    bands.iter().all(|b| !b.is_empty()) && bands.windows(2).all(|w| w[0].end <= w[1].start)
}
