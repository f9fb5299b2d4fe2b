use std::path::Path;

use crate::material::Color;

/// The image sink: collects per-pixel colors into an RGB buffer and
/// saves it when the render is done. Channels are clamped to the
/// 8-bit output range here, at write time, never during shading.
pub struct ImageWriter {
    buffer: image::RgbImage,
}

impl ImageWriter {
    /// Instantiate a writer for a `width` x `height` image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: image::RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Store a pixel. Accepts writes in any order.
    pub fn write_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.buffer.put_pixel(x, y, color.to_rgb());
    }

    /// The stored pixel value, as clamped at write time.
    pub fn pixel(&self, x: u32, y: u32) -> image::Rgb<u8> {
        *self.buffer.get_pixel(x, y)
    }

    /// Encode and save the image; the format follows the path's
    /// extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

#[test]
fn pixels_clamp_at_write_time() {
    let mut writer = ImageWriter::new(4, 2);
    assert_eq!(writer.width(), 4);
    assert_eq!(writer.height(), 2);

    writer.write_pixel(0, 0, Color::new(300.0, -20.0, 64.5));
    assert_eq!(writer.pixel(0, 0), image::Rgb([255, 0, 64]));

    // untouched pixels start black
    assert_eq!(writer.pixel(3, 1), image::Rgb([0, 0, 0]));
}
