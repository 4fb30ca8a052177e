//! Hanover flip-dot wire protocol.
//!
//! ```text
//! | START | ADDR  | LEN   | DATA           | END   | CHECKSUM |
//! | 1B    | 2B    | 2B    | 2B per byte    | 1B    | 2B       |
//! ```
//!
//! Everything between the markers is sent as uppercase ASCII hex. The panel
//! scans columns before rows, so the data region is emitted column-major.

use crate::{
    bitmap::PixelBitmap,
    error::{Error, Result},
    geometry::{Address, CELL_SIZE},
};
use std::fmt::Write as _;

pub const FRAME_START: u8 = 0x02;
pub const FRAME_END: u8 = 0x03;
/// Fixed first byte of the address field.
pub const ADDRESS_PREFIX: u8 = b'1';

/// START + ADDR + LEN + END + CHECKSUM
pub const FRAME_OVERHEAD: usize = 1 + 2 + 2 + 1 + 2;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

#[inline]
fn push_hex(buf: &mut Vec<u8>, byte: u8) {
    buf.push(HEX_DIGITS[usize::from(byte >> 4)]);
    buf.push(HEX_DIGITS[usize::from(byte & 0x0f)]);
}

/// Length of the frame for a bitmap of `byte_count` bytes.
pub fn frame_len(byte_count: usize) -> usize {
    FRAME_OVERHEAD + 2 * byte_count
}

/// Integrity byte over everything from START through END.
///
/// The start marker does not take part in the sum, so a valid frame satisfies
/// `sum(frame[1..=end]) + checksum == 0 (mod 256)`.
pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, byte| acc.wrapping_add(*byte));

    sum.wrapping_sub(FRAME_START).wrapping_neg()
}

/// Bytes in a packed bitmap, or an error if the dimensions are unusable.
fn packed_len(data: &[u8], rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || rows % CELL_SIZE != 0 || cols == 0 {
        return Err(Error::InvalidArgument("bitmap dimensions are not panel aligned"));
    }

    let byte_count = (rows / CELL_SIZE)
        .checked_mul(cols)
        .ok_or(Error::InvalidArgument("bitmap dimensions overflow"))?;
    if data.len() != byte_count {
        return Err(Error::InvalidArgument("bitmap length does not match dimensions"));
    }

    Ok(byte_count)
}

/// Append the column-major hex encoding of a packed bitmap to `out`.
///
/// `data` holds `rows / 8` byte-rows of `cols` bytes.
pub fn transform_column_major(
    data: &[u8],
    rows: usize,
    cols: usize,
    out: &mut Vec<u8>,
) -> Result<()> {
    let byte_count = packed_len(data, rows, cols)?;
    let byte_rows = rows / CELL_SIZE;
    out.try_reserve(2 * byte_count)?;

    for col in 0..cols {
        for byte_row in 0..byte_rows {
            push_hex(out, data[byte_row * cols + col]);
        }
    }

    Ok(())
}

/// Encode a bitmap into a complete frame for the panel at `address`.
pub fn encode_frame(bitmap: &PixelBitmap, address: Address) -> Result<Vec<u8>> {
    encode_raw(bitmap.as_bytes(), bitmap.rows(), bitmap.cols(), address)
}

/// Encode packed bitmap bytes that did not come from a [`PixelBitmap`],
/// such as pages read straight out of an archive.
pub fn encode_raw(data: &[u8], rows: usize, cols: usize, address: Address) -> Result<Vec<u8>> {
    let byte_count = packed_len(data, rows, cols)?;
    let len = frame_len(byte_count);
    let mut frame = Vec::new();
    frame.try_reserve_exact(len)?;

    frame.push(FRAME_START);
    frame.push(ADDRESS_PREFIX);
    frame.push(b'0' + address.get());
    // the length field only carries the low byte
    push_hex(&mut frame, (byte_count & 0xff) as u8);
    transform_column_major(data, rows, cols, &mut frame)?;
    frame.push(FRAME_END);

    let checksum = checksum(&frame);
    push_hex(&mut frame, checksum);

    debug_assert_eq!(frame.len(), len);
    debug!(len, frame = %HexDump(&frame), "encoded frame");

    Ok(frame)
}

struct HexDump<'a>(&'a [u8]);

impl std::fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, byte) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_char(' ')?;
            }
            write!(f, "0x{byte:02x}")?;
        }

        Ok(())
    }
}
