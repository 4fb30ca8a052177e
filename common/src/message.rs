//! Length-prefixed text messages: a little-endian `u16` byte count, then
//! that many bytes of UTF-8.

use crate::error::{Error, Result};
use std::io::{self, Read, Write};

/// Largest message body accepted on the stream.
pub const MAX_MESSAGE_LEN: usize = 2048;

/// Read the next message. `Ok(None)` marks a clean end of stream.
pub fn read_message<R>(reader: &mut R) -> Result<Option<String>>
where
    R: Read + ?Sized,
{
    let mut len_buf = [0u8; 2];
    match reader.read_exact(&mut len_buf[..1]) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(error) => return Err(error.into()),
    }
    reader.read_exact(&mut len_buf[1..])?;

    let len = usize::from(u16::from_le_bytes(len_buf));
    if len > MAX_MESSAGE_LEN {
        return Err(Error::InvalidArgument("message longer than 2048 bytes"));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;

    Ok(Some(String::from_utf8_lossy(&body).into_owned()))
}

/// Write one message, cutting it down to [`MAX_MESSAGE_LEN`] bytes.
pub fn write_message<W>(writer: &mut W, text: &str) -> Result<()>
where
    W: Write + ?Sized,
{
    let mut text = text;
    if text.len() > MAX_MESSAGE_LEN {
        let mut end = MAX_MESSAGE_LEN;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text = &text[..end];
    }

    writer.write_all(&(text.len() as u16).to_le_bytes())?;
    writer.write_all(text.as_bytes())?;

    Ok(())
}

/// Iterator over every message in a stream.
pub struct Messages<R> {
    reader: R,
    done: bool,
}

impl<R> Messages<R>
where
    R: Read,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R> Iterator for Messages<R>
where
    R: Read,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match read_message(&mut self.reader) {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}
