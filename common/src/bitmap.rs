use crate::{
    error::{Error, Result},
    geometry::{CELL_SIZE, Geometry},
};
use rkyv::{Archive, Deserialize, Serialize};

/// Packed monochrome bitmap in the panel's native layout.
///
/// Storage is `rows / 8` byte-rows of `cols` bytes. Bit `b` of the byte at
/// `(group, col)` is the pixel at row `group * 8 + b`.
#[derive(Archive, Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct PixelBitmap {
    rows: u32,
    cols: u32,
    data: Vec<u8>,
}

impl PixelBitmap {
    /// Allocate a blank bitmap covering the whole panel.
    pub fn new(geometry: Geometry) -> Result<Self> {
        let too_large = |_| Error::InvalidArgument("bitmap side does not fit in 32 bits");
        let rows = u32::try_from(geometry.rows()).map_err(too_large)?;
        let cols = u32::try_from(geometry.cols()).map_err(too_large)?;

        let mut data = Vec::new();
        data.try_reserve_exact(geometry.byte_count())?;
        data.resize(geometry.byte_count(), 0);

        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    fn locate(&self, row: usize, col: usize) -> Option<(usize, u8)> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }

        let index = (row / CELL_SIZE) * self.cols() + col;
        Some((index, 1 << (row % CELL_SIZE)))
    }

    /// Pixel state, or `None` outside the bitmap.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.locate(row, col).map(|(index, mask)| self.data[index] & mask != 0)
    }

    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the bitmap.
    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        let Some((index, mask)) = self.locate(row, col) else {
            panic!(
                "pixel ({row}, {col}) outside {}x{} bitmap",
                self.rows, self.cols
            );
        };

        if on {
            self.data[index] |= mask;
        } else {
            self.data[index] &= !mask;
        }
    }
}

impl ArchivedPixelBitmap {
    pub fn rows(&self) -> usize {
        self.rows.to_native() as usize
    }

    pub fn cols(&self) -> usize {
        self.cols.to_native() as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }
}
