use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

/// Channel layout the buffer was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Rgb,
    Rgba,
}

/// A decoded image handed to the cutting pipeline.
///
/// Samples are always held as RGBA; buffers decoded from RGB sources get an
/// alpha of 255 everywhere and remember that they had no alpha channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbaImage,
    channels: Channels,
}

impl PixelBuffer {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image,
            channels: Channels::Rgba,
        }
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(image).into_rgba8(),
            channels: Channels::Rgb,
        }
    }

    /// Convert any decoded image, keeping track of whether it carried alpha.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        if image.color().has_alpha() {
            Self::from_rgba(image.into_rgba8())
        } else {
            Self::from_rgb(image.into_rgb8())
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> &Rgba<u8> {
        self.image.get_pixel(x, y)
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy out a rectangle as a new buffer with the same channel layout.
    ///
    /// The rectangle must lie inside the buffer.
    pub fn sub_buffer(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        debug_assert!(x + width <= self.width() && y + height <= self.height());
        Self {
            image: image::imageops::crop_imm(&self.image, x, y, width, height).to_image(),
            channels: self.channels,
        }
    }
}
