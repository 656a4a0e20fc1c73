use crate::math::Vec3;
use crate::util::Array2D;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

/// 8-bit RGB image, row-major, in the layout SDL's RGB24 textures expect.
pub struct ImageRgbU8 {
    pixel_data: Vec<u8>,
    width: usize,
    height: usize,
}

impl ImageRgbU8 {
    pub fn new(width: usize, height: usize) -> ImageRgbU8 {
        ImageRgbU8 {
            width,
            height,
            pixel_data: vec![0; width * height * Self::num_channels()],
        }
    }

    pub fn num_channels() -> usize {
        3
    }

    /// Reallocate if the dimensions changed; contents are unspecified after.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            *self = ImageRgbU8::new(width, height);
        }
    }

    pub fn set_colour(&mut self, row: usize, column: usize, colour: [u8; 3]) {
        assert!(row < self.height && column < self.width);
        let index = (row * self.width + column) * Self::num_channels();
        self.pixel_data[index..index + 3].copy_from_slice(&colour);
    }

    pub fn get_colour(&self, row: usize, column: usize) -> [u8; 3] {
        assert!(row < self.height && column < self.width);
        let index = (row * self.width + column) * Self::num_channels();
        [
            self.pixel_data[index],
            self.pixel_data[index + 1],
            self.pixel_data[index + 2],
        ]
    }

    pub fn get_pixel_data(&self) -> &[u8] {
        &self.pixel_data
    }

    pub fn get_width(&self) -> usize {
        self.width
    }

    pub fn get_height(&self) -> usize {
        self.height
    }

    pub fn write_png(&self, path: &Path) -> Result<(), ImageWriteError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = png::Encoder::new(writer, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::RGB);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.write_header()?.write_image_data(&self.pixel_data)?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ImageWriteError {
    #[error("could not write image file")]
    Io(#[from] std::io::Error),

    #[error("could not encode PNG")]
    Encoding(#[from] png::EncodingError),
}

/// Conversion from a linear floating-point image to displayable 8-bit RGB.
pub trait ToneMapper<T> {
    fn apply_tone_mapping(&self, image_in: &Array2D<T>, image_out: &mut ImageRgbU8);
}

/// Clamp each channel to [0, 1] and quantize. No gamma curve is applied;
/// the display path treats the frame as already displayable.
pub struct ClampingToneMapper {}

impl ClampingToneMapper {
    fn quantize(value: f32) -> u8 {
        (value.max(0.0).min(1.0) * 255.0).round() as u8
    }
}

impl ToneMapper<Vec3> for ClampingToneMapper {
    fn apply_tone_mapping(&self, image_in: &Array2D<Vec3>, image_out: &mut ImageRgbU8) {
        assert!(image_in.get_width() == image_out.get_width());
        assert!(image_in.get_height() == image_out.get_height());
        for row in 0..image_in.get_height() {
            for (column, pixel) in image_in[row].iter().enumerate() {
                image_out.set_colour(
                    row,
                    column,
                    [
                        Self::quantize(pixel.x()),
                        Self::quantize(pixel.y()),
                        Self::quantize(pixel.z()),
                    ],
                );
            }
        }
    }
}
