//! Synthetic sheets shared by the unit tests.

use image::{Rgba, RgbaImage};

use crate::grid::Rect;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Side of one cell in the generated sheets
pub const CELL: u32 = 40;
/// Thickness of separator lines in `separator_sheet`
pub const LINE: u32 = 4;

/// A distinct saturated color per cell index
pub fn palette(index: usize) -> Rgba<u8> {
    const COLORS: [[u8; 3]; 9] = [
        [200, 30, 30],
        [30, 160, 40],
        [40, 60, 200],
        [180, 150, 20],
        [150, 40, 160],
        [20, 150, 150],
        [120, 70, 20],
        [90, 90, 90],
        [220, 100, 60],
    ];
    let [r, g, b] = COLORS[index % COLORS.len()];
    Rgba([r, g, b, 255])
}

pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

pub fn fill(image: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            image.put_pixel(x, y, color);
        }
    }
}

/// White sheet of `rows` x `cols` cells divided by black lines.
///
/// Cell (r, c) starts at `(c * (CELL + LINE), r * (CELL + LINE))` and holds a
/// centered 20x20 square colored `palette(r * cols + c)`. There is no outer
/// frame.
pub fn separator_sheet(rows: u32, cols: u32) -> RgbaImage {
    let width = cols * CELL + (cols - 1) * LINE;
    let height = rows * CELL + (rows - 1) * LINE;
    let mut sheet = filled(width, height, WHITE);

    for i in 1..rows {
        let y = i * (CELL + LINE) - LINE;
        fill(&mut sheet, Rect::new(0, y, width, LINE), BLACK);
    }
    for i in 1..cols {
        let x = i * (CELL + LINE) - LINE;
        fill(&mut sheet, Rect::new(x, 0, LINE, height), BLACK);
    }
    for r in 0..rows {
        for c in 0..cols {
            let index = (r * cols + c) as usize;
            let square = Rect::new(c * (CELL + LINE) + 10, r * (CELL + LINE) + 10, 20, 20);
            fill(&mut sheet, square, palette(index));
        }
    }

    sheet
}

/// White sheet of `rows` x `cols` cells with no drawn separators.
///
/// Cells of `CELL` pixels sit `gap` pixels apart inside a `margin` border;
/// each holds a centered 30x30 colored square.
pub fn gap_sheet(rows: u32, cols: u32, margin: u32, gap: u32) -> RgbaImage {
    let width = 2 * margin + cols * CELL + (cols - 1) * gap;
    let height = 2 * margin + rows * CELL + (rows - 1) * gap;
    let mut sheet = filled(width, height, WHITE);

    for r in 0..rows {
        for c in 0..cols {
            let index = (r * cols + c) as usize;
            let x = margin + c * (CELL + gap) + 5;
            let y = margin + r * (CELL + gap) + 5;
            fill(&mut sheet, Rect::new(x, y, 30, 30), palette(index));
        }
    }

    sheet
}
