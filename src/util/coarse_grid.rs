/// A rectangular pixel region, already clipped to the image bounds.
#[derive(Copy, Clone, Debug)]
pub struct Tile {
    pub start_column: usize,
    pub end_column: usize,
    pub start_row: usize,
    pub end_row: usize,
}

impl Tile {
    pub fn width(&self) -> usize {
        self.end_column - self.start_column
    }
    pub fn height(&self) -> usize {
        self.end_row - self.start_row
    }
}

/// One cell of a [CoarseGrid]: its grid coordinates and the pixels its
/// radiance estimate is splatted over.
#[derive(Copy, Clone, Debug)]
pub struct CoarseCell {
    pub column: usize,
    pub row: usize,
    pub pixels: Tile,
}

/// The grid of `cell_size` x `cell_size` cells a render pass samples.
///
/// A worker at coarseness `scale` traces one ray per cell of the grid with
/// `cell_size = scale` and splats the result over the cell's pixel tile.
/// Cells in the last column and row are clipped to the image, so the tiles
/// cover every pixel exactly once.
#[derive(Copy, Clone, Debug)]
pub struct CoarseGrid {
    image_width: usize,
    image_height: usize,
    cell_size: usize,
}

impl CoarseGrid {
    pub fn new(image_width: usize, image_height: usize, cell_size: usize) -> CoarseGrid {
        assert!(cell_size > 0);
        CoarseGrid {
            image_width,
            image_height,
            cell_size,
        }
    }

    /// Number of cell columns, counting a clipped final column.
    pub fn columns(&self) -> usize {
        (self.image_width + self.cell_size - 1) / self.cell_size
    }

    /// Number of cell rows, counting a clipped final row.
    pub fn rows(&self) -> usize {
        (self.image_height + self.cell_size - 1) / self.cell_size
    }

    /// The cell at the given grid coordinates.
    pub fn cell(&self, column: usize, row: usize) -> CoarseCell {
        let start_column = column * self.cell_size;
        let start_row = row * self.cell_size;
        CoarseCell {
            column,
            row,
            pixels: Tile {
                start_column,
                end_column: self.image_width.min(start_column + self.cell_size),
                start_row,
                end_row: self.image_height.min(start_row + self.cell_size),
            },
        }
    }

    /// All cells of the grid, row by row.
    pub fn cells(&self) -> impl Iterator<Item = CoarseCell> {
        let grid = *self;
        (0..grid.rows())
            .flat_map(move |row| (0..grid.columns()).map(move |column| grid.cell(column, row)))
    }

    /// The screen coordinates sampled for a cell, in [0, 1]².
    ///
    /// Inverted in both axes so the on-screen orientation matches the
    /// camera.
    pub fn screen_uv(&self, cell: &CoarseCell) -> (f32, f32) {
        let u = 1.0 - cell.column as f32 / self.columns().saturating_sub(1).max(1) as f32;
        let v = 1.0 - cell.row as f32 / self.rows().saturating_sub(1).max(1) as f32;
        (u, v)
    }
}
