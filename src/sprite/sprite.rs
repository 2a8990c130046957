use image::RgbaImage;
use serde::Serialize;

use crate::grid::Rect;

/// Where a sprite came from and where its pixels ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Cell rectangle in the sheet
    pub cell: Rect,
    /// Padded crop rectangle, relative to the cell
    pub crop: Rect,
    /// Scaled crop on the output canvas (the whole canvas when not resized)
    pub content: Rect,
}

impl Placement {
    /// Crop rectangle in sheet coordinates
    pub fn crop_in_sheet(&self) -> Rect {
        Rect::new(
            self.cell.x + self.crop.x,
            self.cell.y + self.crop.y,
            self.crop.width,
            self.crop.height,
        )
    }
}

/// A background-free, cropped and sized image cut from one cell
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Row-major position in the sheet; also the output file name
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub image: RgbaImage,
    pub placement: Placement,
}

impl Sprite {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_in_sheet() {
        let placement = Placement {
            cell: Rect::new(44, 88, 40, 40),
            crop: Rect::new(5, 7, 20, 10),
            content: Rect::new(0, 0, 20, 10),
        };

        assert_eq!(placement.crop_in_sheet(), Rect::new(49, 95, 20, 10));
    }
}
