use font8x8::UnicodeFonts;

/// 8x8 glyph, one byte per row. Bit `j` of row `i` is pixel `(i, j)`, LSB leftmost.
pub type Glyph = [u8; 8];

pub const BLANK: Glyph = [0; 8];

/// Character to glyph lookup used by the layout engine.
pub trait GlyphSource {
    fn glyph(&self, ch: char) -> Glyph;
}

/// The public-domain `font8x8` basic latin table.
///
/// Characters outside the table are drawn as `?`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicFont;

impl GlyphSource for BasicFont {
    fn glyph(&self, ch: char) -> Glyph {
        font8x8::BASIC_FONTS
            .get(ch)
            .or_else(|| font8x8::BASIC_FONTS.get('?'))
            .unwrap_or(BLANK)
    }
}

impl<F> GlyphSource for F
where
    F: Fn(char) -> Glyph,
{
    fn glyph(&self, ch: char) -> Glyph {
        self(ch)
    }
}
