use crate::error::{Error, Result};
use std::io::{self, Write};

/// Push the whole frame into the transport.
///
/// Serial lines may take fewer bytes than offered, so this keeps writing the
/// remainder. A write that accepts nothing, or fails, ends the attempt.
pub fn write_frame<W>(transport: &mut W, frame: &[u8]) -> Result<()>
where
    W: Write + ?Sized,
{
    if frame.is_empty() {
        return Err(Error::InvalidArgument("refusing to write an empty frame"));
    }

    let mut remaining = frame;
    while !remaining.is_empty() {
        match transport.write(remaining)? {
            0 => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("transport stalled with {} bytes left", remaining.len()),
                )));
            }
            written => {
                remaining = &remaining[written.min(remaining.len())..];
                trace!(written, left = remaining.len(), "wrote to transport");
            }
        }
    }

    transport.flush()?;

    Ok(())
}
