use crate::math::Vec3;
use crate::util::{Array2D, Tile};

/// Running weighted sum of radiance estimates.
///
/// Pixels hold plain sums; dividing by [weight](AccumulationBuffer::weight)
/// yields the current estimate. Keeping sums rather than running means makes
/// merging buffers from different workers a componentwise addition.
#[derive(Clone)]
pub struct AccumulationBuffer {
    pixels: Array2D<Vec3>,
    weight: f32,
}

impl AccumulationBuffer {
    pub fn new(width: usize, height: usize) -> AccumulationBuffer {
        AccumulationBuffer {
            pixels: Array2D::new(height, width),
            weight: 0.0,
        }
    }

    pub fn width(&self) -> usize {
        self.pixels.get_width()
    }

    pub fn height(&self) -> usize {
        self.pixels.get_height()
    }

    /// Total weight accumulated so far; 0 means the buffer is empty.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_empty(&self) -> bool {
        self.weight == 0.0
    }

    pub fn pixel(&self, row: usize, column: usize) -> Vec3 {
        self.pixels[row][column]
    }

    /// Zero all pixel sums and the weight.
    pub fn reset(&mut self) {
        self.pixels.clear();
        self.weight = 0.0;
    }

    /// Add `colour * weight` to every pixel covered by `tile`.
    ///
    /// The tile is expected to be clipped to the buffer already, as the
    /// cells produced by [CoarseGrid](crate::util::CoarseGrid) are.
    pub fn splat(&mut self, tile: &Tile, colour: &Vec3, weight: f32) {
        let weighted = *colour * weight;
        for row in tile.start_row..tile.end_row {
            for pixel in self.pixels[row][tile.start_column..tile.end_column].iter_mut() {
                *pixel += weighted;
            }
        }
    }

    /// Increase the total weight, typically by once per finished pass.
    pub fn add_weight(&mut self, weight: f32) {
        self.weight += weight;
    }

    /// Merge another buffer of the same dimensions into this one.
    pub fn add(&mut self, other: &AccumulationBuffer) {
        assert!(self.width() == other.width() && self.height() == other.height());
        for (destination, source) in self
            .pixels
            .as_mut_slice()
            .iter_mut()
            .zip(other.pixels.as_slice().iter())
        {
            *destination += *source;
        }
        self.weight += other.weight;
    }

    /// Write `pixels / weight` into `frame`.
    ///
    /// A plain division per pixel, so the frame is bit-for-bit the quotient
    /// of the sums and the weight. The caller must make sure the buffer is
    /// non-empty.
    pub fn normalize_into(&self, frame: &mut Array2D<Vec3>) {
        debug_assert!(self.weight > 0.0);
        for (destination, source) in frame
            .as_mut_slice()
            .iter_mut()
            .zip(self.pixels.as_slice().iter())
        {
            *destination = *source / self.weight;
        }
    }
}
