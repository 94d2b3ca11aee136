use super::attributes::FrameBufferAttributes;

/// Frame buffer holding the render result.
///
/// Cells are addressed by `(x, y)` with `x` the column and `y` the row, and
/// row 0 is the **bottom** of the picture: normalized device `y = -1` lands on
/// row 0 and `y = +1` on the last row. [`FrameBuffer::to_rgba_bytes`] flips the
/// rows so the written image is upright.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<FrameBufferAttributes>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            cells: vec![FrameBufferAttributes::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Returns the cell at `(x, y)`, or `None` outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> Option<&FrameBufferAttributes> {
        if x < self.width && y < self.height {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut FrameBufferAttributes> {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.cells.get_mut(index)
        } else {
            None
        }
    }

    /// All cells in row-major order, bottom row first.
    pub fn cells(&self) -> &[FrameBufferAttributes] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [FrameBufferAttributes] {
        &mut self.cells
    }

    /// Resets every cell to its initial state (zero color, infinite depth).
    pub fn clear(&mut self) {
        self.cells.fill(FrameBufferAttributes::default());
    }

    /// Packs the buffer into RGBA8 bytes, row-major, top image row first.
    ///
    /// Channels are expected to already be in `[0, 255]`; anything outside is
    /// clamped and fractions are truncated. NaN becomes 0.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(self.width * self.height * 4);
        for row in (0..self.height).rev() {
            let start = row * self.width;
            for cell in &self.cells[start..start + self.width] {
                image.extend(cell.color.iter().map(|&c| channel_to_u8(c)));
            }
        }
        image
    }

    /// Depth of every cell, laid out like [`FrameBuffer::to_rgba_bytes`].
    pub fn depth_values(&self) -> Vec<f32> {
        let mut depths = Vec::with_capacity(self.width * self.height);
        for row in (0..self.height).rev() {
            let start = row * self.width;
            depths.extend(self.cells[start..start + self.width].iter().map(|c| c.depth));
        }
        depths
    }

    /// Number of cells that have received a finite depth.
    pub fn covered_count(&self) -> usize {
        self.cells.iter().filter(|c| c.depth.is_finite()).count()
    }
}

#[inline]
fn channel_to_u8(value: f32) -> u8 {
    // `as` saturates and maps NaN to 0
    value.clamp(0.0, 255.0) as u8
}
