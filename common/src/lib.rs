//! Hanover flip-dot panel protocol and text layout.

#[macro_use]
extern crate tracing;

pub mod bitmap;
pub mod display;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod message;
pub mod protocol;
pub mod transport;

pub use self::{
    bitmap::{ArchivedPixelBitmap, PixelBitmap},
    display::Display,
    error::{Error, ErrorKind, Result},
    font::{BasicFont, Glyph, GlyphSource},
    geometry::{Address, Geometry},
    layout::{Page, Pages, WrapPolicy, layout_text},
};
