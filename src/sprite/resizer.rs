use image::{DynamicImage, Rgba32FImage, RgbaImage, imageops};

use crate::cli::ResizeFilter;
use crate::grid::Rect;

/// Dimensions of `width` x `height` scaled so the longer side equals `size`.
///
/// The shorter side is rounded and never drops below one pixel.
pub fn fit_within(width: u32, height: u32, size: u32) -> (u32, u32) {
    let scale_side = |short: u32, long: u32| {
        let scaled = (u64::from(short) * u64::from(size) + u64::from(long) / 2) / u64::from(long);
        u32::try_from(scaled).unwrap_or(size).clamp(1, size)
    };

    if width >= height {
        (size, scale_side(height, width))
    } else {
        (scale_side(width, height), size)
    }
}

/// Scale `image` to fit a `size` x `size` square and center it on a
/// transparent canvas.
///
/// Returns the canvas and the rectangle the scaled image occupies on it.
pub fn letterbox(image: &RgbaImage, size: u32, filter: ResizeFilter) -> (RgbaImage, Rect) {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = fit_within(width, height, size);

    let resized = if (new_width, new_height) == (width, height) {
        image.clone()
    } else {
        resize_premultiplied(image, new_width, new_height, filter)
    };

    let x = (size - new_width) / 2;
    let y = (size - new_height) / 2;
    let mut canvas = RgbaImage::new(size, size);
    imageops::replace(&mut canvas, &resized, i64::from(x), i64::from(y));

    (canvas, Rect::new(x, y, new_width, new_height))
}

/// Resize with color weighted by alpha, so transparent pixels do not bleed
/// their RGB into the edges of the content.
fn resize_premultiplied(
    image: &RgbaImage,
    width: u32,
    height: u32,
    filter: ResizeFilter,
) -> RgbaImage {
    let mut linear = DynamicImage::ImageRgba8(image.clone()).into_rgba32f();
    for pixel in linear.pixels_mut() {
        let alpha = pixel[3];
        for channel in &mut pixel.0[..3] {
            *channel *= alpha;
        }
    }

    let mut resized: Rgba32FImage =
        imageops::resize(&linear, width, height, filter.to_image_filter());
    for pixel in resized.pixels_mut() {
        let alpha = pixel[3].clamp(0.0, 1.0);
        for channel in &mut pixel.0[..3] {
            *channel = if alpha > 0.0 {
                (*channel / alpha).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
        pixel[3] = alpha;
    }

    DynamicImage::ImageRgba32F(resized).into_rgba8()
}
