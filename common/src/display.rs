use crate::{
    bitmap::PixelBitmap,
    error::{Error, Result},
    geometry::{Address, Geometry},
    protocol, transport,
};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

/// A flip-dot panel behind an already configured byte transport.
#[derive(Debug)]
pub struct Display<T = File> {
    transport: Option<T>,
    address: Address,
    geometry: Geometry,
}

impl Display<File> {
    /// Open the serial device at `path`.
    ///
    /// The line settings (4800 baud, 8N1, raw) must be applied beforehand.
    pub fn open(path: impl AsRef<Path>, address: Address, geometry: Geometry) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("empty device path"));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), address = address.get(), "opened display");

        Ok(Self::new(file, address, geometry))
    }
}

impl<T> Display<T>
where
    T: Write,
{
    pub fn new(transport: T, address: Address, geometry: Geometry) -> Self {
        Self {
            transport: Some(transport),
            address,
            geometry,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Encode `bitmap` and send it to the panel.
    pub fn show(&mut self, bitmap: &PixelBitmap) -> Result<()> {
        self.show_raw(bitmap.as_bytes(), bitmap.rows(), bitmap.cols())
    }

    /// Like [`Display::show`] for packed bitmap bytes from elsewhere.
    pub fn show_raw(&mut self, data: &[u8], rows: usize, cols: usize) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(Error::AlreadyReleased)?;
        if rows != self.geometry.rows() || cols != self.geometry.cols() {
            return Err(Error::InvalidArgument("bitmap does not match panel geometry"));
        }

        let frame = protocol::encode_raw(data, rows, cols, self.address)?;
        transport::write_frame(transport, &frame)
    }

    /// Release the transport. Closing twice is an error.
    pub fn close(&mut self) -> Result<()> {
        let mut transport = self.transport.take().ok_or(Error::AlreadyReleased)?;
        transport.flush()?;
        info!(address = self.address.get(), "closed display");

        Ok(())
    }

    /// The underlying transport, while the display is open.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }
}
