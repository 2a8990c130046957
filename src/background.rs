use std::collections::VecDeque;

use image::Rgba;

use crate::config::CutConfig;
use crate::grid::Rect;
use crate::sprite::PixelBuffer;

/// Per-pixel keep/drop flags aligned with a cell buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    /// Row-major, `true` = opaque
    opaque: Vec<bool>,
}

impl AlphaMask {
    /// A mask with every pixel opaque
    pub fn opaque(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            opaque: vec![true; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn is_opaque(&self, x: u32, y: u32) -> bool {
        self.opaque[self.index(x, y)]
    }

    pub fn opaque_count(&self) -> usize {
        self.opaque.iter().filter(|&&o| o).count()
    }

    /// Tight bounds of the opaque pixels, `None` if there are none
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut min_x = self.width;
        let mut min_y = self.height;
        let mut max_x = 0u32;
        let mut max_y = 0u32;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_opaque(x, y) {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        if max_x < min_x || max_y < min_y {
            return None;
        }
        Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

/// Mark the white background of a cell as transparent.
///
/// Flood fills from every near-white pixel on the cell border through
/// 4-connected near-white pixels. Near-white regions the fill cannot reach,
/// such as highlights enclosed by an outline, stay opaque. Pixels that are
/// already fully transparent are always background and let the fill pass.
pub fn remove_background(cell: &PixelBuffer, config: &CutConfig) -> AlphaMask {
    let (width, height) = (cell.width(), cell.height());
    let mut mask = AlphaMask::opaque(width, height);
    if cell.is_empty() {
        return mask;
    }

    let tolerance = config.flood_tolerance;
    let passable = |pixel: &Rgba<u8>| {
        let [r, g, b, a] = pixel.0;
        a == 0 || [r, g, b].iter().all(|&c| 255 - c <= tolerance)
    };

    for (x, y, pixel) in cell.as_rgba().enumerate_pixels() {
        if pixel[3] == 0 {
            let i = mask.index(x, y);
            mask.opaque[i] = false;
        }
    }

    let mut visited = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();

    for (x, y) in border(width, height) {
        let i = mask.index(x, y);
        if !visited[i] && passable(cell.pixel(x, y)) {
            visited[i] = true;
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let i = mask.index(x, y);
        mask.opaque[i] = false;

        for (nx, ny) in neighbors(x, y, width, height) {
            let n = mask.index(nx, ny);
            if !visited[n] && passable(cell.pixel(nx, ny)) {
                visited[n] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    mask
}

/// Every border coordinate, corners included once
fn border(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let horizontal = (0..width).flat_map(move |x| {
        let bottom = (height > 1).then_some((x, height - 1));
        std::iter::once((x, 0)).chain(bottom)
    });
    let vertical = (1..height.saturating_sub(1)).flat_map(move |y| {
        let right = (width > 1).then_some((width - 1, y));
        std::iter::once((0, y)).chain(right)
    });
    horizontal.chain(vertical)
}

fn neighbors(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let left = x.checked_sub(1).map(|nx| (nx, y));
    let up = y.checked_sub(1).map(|ny| (x, ny));
    let right = (x + 1 < width).then_some((x + 1, y));
    let down = (y + 1 < height).then_some((x, y + 1));
    [left, up, right, down].into_iter().flatten()
}
