use crate::error::{Error, Result};

/// Side length of a glyph cell in pixels.
pub const CELL_SIZE: usize = 8;

/// Largest panel side, in pixels, the driver accepts.
pub const MAX_SIDE: usize = u16::MAX as usize;

/// Panel dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    rows: usize,
    cols: usize,
    byte_count: usize,
}

impl Geometry {
    /// `rows` must be a positive multiple of 8 and `cols` at least one cell wide.
    /// Neither side may exceed [`MAX_SIDE`].
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || rows % CELL_SIZE != 0 {
            return Err(Error::InvalidArgument("rows must be a positive multiple of 8"));
        }
        if cols < CELL_SIZE {
            return Err(Error::InvalidArgument("cols must be at least 8"));
        }
        if rows > MAX_SIDE || cols > MAX_SIDE {
            return Err(Error::InvalidArgument("panel sides are limited to 65535 pixels"));
        }

        let byte_count = (rows / CELL_SIZE)
            .checked_mul(cols)
            .ok_or(Error::InvalidArgument("panel too large"))?;

        Ok(Self {
            rows,
            cols,
            byte_count,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Character cells per row
    pub fn grid_cols(&self) -> usize {
        self.cols / CELL_SIZE
    }

    /// Character rows
    pub fn grid_rows(&self) -> usize {
        self.rows / CELL_SIZE
    }

    /// Number of characters that fit on one page without wrapping losses.
    pub fn cells(&self) -> usize {
        self.grid_cols() * self.grid_rows()
    }

    /// Size of the packed bitmap in bytes.
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }
}

/// Protocol address of a panel on the bus, a single decimal digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address(u8);

impl Address {
    pub const MAX: u8 = 9;

    pub fn new(address: u8) -> Result<Self> {
        if address > Self::MAX {
            return Err(Error::InvalidArgument("address must be between 0 and 9"));
        }

        Ok(Self(address))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn geometry_validation() {
        let geometry = Geometry::new(16, 96).unwrap();
        assert_eq!(geometry.grid_rows(), 2);
        assert_eq!(geometry.grid_cols(), 12);
        assert_eq!(geometry.cells(), 24);
        assert_eq!(geometry.byte_count(), 192);

        for (rows, cols) in [(0, 96), (12, 96), (16, 7), (16, 0)] {
            let error = Geometry::new(rows, cols).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidArgument, "{rows}x{cols}");
        }
    }

    #[test]
    fn oversized_geometry_is_rejected() {
        for (rows, cols) in [(1 << 61, 64), (16, 1 << 40), (65_536, 96), (16, 65_536)] {
            let error = Geometry::new(rows, cols).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidArgument, "{rows}x{cols}");
        }

        let largest = Geometry::new(65_528, 65_535).unwrap();
        assert_eq!(largest.byte_count(), 8191 * 65_535);
    }

    #[test]
    fn address_is_single_digit() {
        assert_eq!(Address::new(0).unwrap().get(), 0);
        assert_eq!(Address::new(9).unwrap().get(), 9);
        assert_eq!(Address::new(10).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
}
