use image::RgbaImage;

use super::{PixelBuffer, Placement, Sprite, letterbox};
use crate::background::AlphaMask;
use crate::config::CutConfig;
use crate::grid::{Cell, Rect};

/// Crop a cell to its opaque content plus padding, then size it.
///
/// An all-transparent mask keeps the whole cell rather than producing an
/// empty image. With `target_size == 0` the padded crop is returned as is;
/// otherwise it is scaled to fit and centered on a transparent square.
pub fn crop_and_resize(cell: &Cell, mask: &AlphaMask, config: &CutConfig) -> Sprite {
    let buffer = &cell.buffer;
    let (width, height) = (buffer.width(), buffer.height());
    debug_assert_eq!((mask.width(), mask.height()), (width, height));

    let bounds = mask
        .bounding_box()
        .unwrap_or_else(|| Rect::new(0, 0, width, height));
    let crop = bounds.expand_clamped(config.padding, width, height);
    let cropped = apply_mask(buffer, mask, crop);

    let (image, content) = if config.target_size == 0 {
        (cropped, Rect::new(0, 0, crop.width, crop.height))
    } else {
        letterbox(&cropped, config.target_size, config.resize_filter)
    };

    Sprite {
        index: cell.index,
        row: cell.row,
        col: cell.col,
        image,
        placement: Placement {
            cell: cell.rect,
            crop,
            content,
        },
    }
}

/// Copy `crop` out of `buffer`, zeroing alpha wherever the mask drops a pixel.
fn apply_mask(buffer: &PixelBuffer, mask: &AlphaMask, crop: Rect) -> RgbaImage {
    RgbaImage::from_fn(crop.width, crop.height, |x, y| {
        let (sx, sy) = (crop.x + x, crop.y + y);
        let mut pixel = *buffer.pixel(sx, sy);
        if !mask.is_opaque(sx, sy) {
            pixel[3] = 0;
        }
        pixel
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::remove_background;
    use crate::fixtures::{self, WHITE};
    use image::Rgba;

    fn cell_of(image: RgbaImage) -> Cell {
        let (w, h) = image.dimensions();
        Cell {
            index: 4,
            row: 1,
            col: 1,
            rect: Rect::new(100, 100, w, h),
            buffer: PixelBuffer::from_rgba(image),
        }
    }

    fn cut(image: RgbaImage, config: &CutConfig) -> Sprite {
        let cell = cell_of(image);
        let mask = remove_background(&cell.buffer, config);
        crop_and_resize(&cell, &mask, config)
    }

    #[test]
    fn test_tight_crop_with_padding() {
        let mut img = fixtures::filled(40, 40, WHITE);
        fixtures::fill(&mut img, Rect::new(15, 17, 10, 6), fixtures::palette(0));
        let config = CutConfig::default().target_size(0).padding(3);

        let sprite = cut(img, &config);

        assert_eq!((sprite.width(), sprite.height()), (16, 12));
        assert_eq!(sprite.placement.crop, Rect::new(12, 14, 16, 12));
        assert_eq!(sprite.placement.crop_in_sheet(), Rect::new(112, 114, 16, 12));
        assert_eq!(sprite.image.get_pixel(0, 0)[3], 0);
        assert_eq!(sprite.image.get_pixel(2, 5)[3], 0);
        assert_eq!(*sprite.image.get_pixel(3, 3), fixtures::palette(0));
        assert_eq!((sprite.index, sprite.row, sprite.col), (4, 1, 1));
    }

    #[test]
    fn test_padding_clamped_to_cell() {
        let mut img = fixtures::filled(30, 20, WHITE);
        fixtures::fill(&mut img, Rect::new(0, 0, 5, 5), fixtures::palette(1));
        fixtures::fill(&mut img, Rect::new(27, 18, 3, 2), fixtures::palette(2));
        let config = CutConfig::default().target_size(0).padding(10);

        let sprite = cut(img, &config);

        assert_eq!(sprite.placement.crop, Rect::new(0, 0, 30, 20));
        assert_eq!((sprite.width(), sprite.height()), (30, 20));
    }

    #[test]
    fn test_empty_cell_keeps_full_extent() {
        let config = CutConfig::default().target_size(0).padding(4);

        let sprite = cut(fixtures::filled(25, 15, WHITE), &config);

        assert_eq!((sprite.width(), sprite.height()), (25, 15));
        assert!(sprite.image.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_target_size_letterboxes() {
        let mut img = fixtures::filled(40, 40, WHITE);
        fixtures::fill(&mut img, Rect::new(15, 17, 10, 6), fixtures::palette(0));
        let config = CutConfig::default().target_size(64).padding(3);

        let sprite = cut(img, &config);

        // 16x12 crop scaled to 64x48, centered vertically
        assert_eq!((sprite.width(), sprite.height()), (64, 64));
        assert_eq!(sprite.placement.content, Rect::new(0, 8, 64, 48));
        assert_eq!(sprite.image.get_pixel(32, 2)[3], 0);
        assert_eq!(sprite.image.get_pixel(32, 61)[3], 0);
        assert!(sprite.image.get_pixel(32, 32)[3] > 200);
    }

    #[test]
    fn test_scaled_edges_keep_sprite_color() {
        let mut img = fixtures::filled(81, 81, WHITE);
        fixtures::fill(&mut img, Rect::new(20, 20, 41, 41), fixtures::BLACK);
        let config = CutConfig::default().target_size(16).padding(10);

        let sprite = cut(img, &config);

        let partial: Vec<_> = sprite
            .image
            .pixels()
            .filter(|p| p[3] > 0 && p[3] < 255)
            .collect();
        assert!(!partial.is_empty());
        assert!(partial.iter().all(|p| p[0] < 8 && p[1] < 8 && p[2] < 8));
    }

    #[test]
    fn test_every_target_size_is_exact() {
        let mut img = fixtures::filled(50, 30, WHITE);
        fixtures::fill(&mut img, Rect::new(10, 5, 31, 7), fixtures::palette(3));

        for size in [1, 7, 32, 100, 513] {
            let config = CutConfig::default().target_size(size).padding(2);
            let sprite = cut(img.clone(), &config);
            assert_eq!((sprite.width(), sprite.height()), (size, size));
        }
    }

    #[test]
    fn test_source_alpha_survives() {
        let mut img = fixtures::filled(10, 10, WHITE);
        fixtures::fill(&mut img, Rect::new(4, 4, 2, 2), Rgba([200, 30, 30, 128]));
        let config = CutConfig::default().target_size(0).padding(0);

        let sprite = cut(img, &config);

        assert_eq!((sprite.width(), sprite.height()), (2, 2));
        assert_eq!(*sprite.image.get_pixel(1, 1), Rgba([200, 30, 30, 128]));
    }

    #[test]
    fn test_enclosed_white_kept_in_output() {
        let mut img = fixtures::filled(20, 20, WHITE);
        fixtures::fill(&mut img, Rect::new(6, 6, 8, 8), fixtures::BLACK);
        fixtures::fill(&mut img, Rect::new(8, 8, 4, 4), WHITE);
        let config = CutConfig::default().target_size(0).padding(0);

        let sprite = cut(img, &config);

        assert_eq!((sprite.width(), sprite.height()), (8, 8));
        assert_eq!(*sprite.image.get_pixel(3, 3), WHITE);
    }
}
