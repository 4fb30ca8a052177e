//! Greedy word-wrapping text layout on the panel's character-cell grid.

use crate::{
    bitmap::PixelBitmap,
    error::Result,
    font::{Glyph, GlyphSource},
    geometry::{CELL_SIZE, Geometry},
};

/// When a word counts as fitting into the rest of the current row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WrapPolicy {
    /// The word fits when it fills at most every cell after the space.
    #[default]
    Exact,
    /// Keep one spare cell at the end of the row, as older panel firmware did.
    KeepSpare,
}

impl WrapPolicy {
    fn fits(self, word_len: usize, col: usize, grid_cols: usize) -> bool {
        let reserved = match self {
            Self::Exact => 1,
            Self::KeepSpare => 2,
        };

        word_len <= grid_cols.saturating_sub(col + reserved)
    }
}

/// Copy a glyph into the 8x8 cell whose top-left pixel is `(row0, col0)`.
///
/// The cell must lie inside the bitmap.
pub fn rasterize_glyph(bitmap: &mut PixelBitmap, row0: usize, col0: usize, glyph: &Glyph) {
    for (i, bits) in glyph.iter().enumerate() {
        for j in 0..CELL_SIZE {
            bitmap.set(row0 + i, col0 + j, bits & (1 << j) != 0);
        }
    }
}

/// Length of the word starting at `start`, or `None` when no word starts there.
fn word_len_at(chars: &[char], start: usize) -> Option<usize> {
    match chars.get(start) {
        Some(ch) if *ch != ' ' => Some(chars[start..].iter().take_while(|ch| **ch != ' ').count()),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct Cursor {
    row: usize,
    col: usize,
}

impl Cursor {
    fn advance(&mut self, grid_cols: usize) {
        if self.col + 1 < grid_cols {
            self.col += 1;
        } else {
            self.row += 1;
            self.col = 0;
        }
    }

    fn next_row(&mut self) {
        self.row += 1;
        self.col = 0;
    }
}

/// Render `text` into `bitmap`, returning how many characters were consumed.
///
/// Layout stops early when the page is full; the caller resumes with the
/// unconsumed remainder on a fresh bitmap.
pub fn layout_text<G>(
    text: &str,
    bitmap: &mut PixelBitmap,
    font: &G,
    policy: WrapPolicy,
) -> usize
where
    G: GlyphSource + ?Sized,
{
    let grid_cols = bitmap.cols() / CELL_SIZE;
    let grid_rows = bitmap.rows() / CELL_SIZE;
    if grid_cols == 0 || grid_rows == 0 {
        return 0;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut cursor = Cursor::default();
    let mut consumed = 0;

    while let Some(&ch) = chars.get(consumed) {
        // blanks at the start of a row are dropped
        if ch == ' ' && cursor.col == 0 {
            consumed += 1;
            continue;
        }

        if cursor.row >= grid_rows {
            return consumed;
        }

        rasterize_glyph(
            bitmap,
            cursor.row * CELL_SIZE,
            cursor.col * CELL_SIZE,
            &font.glyph(ch),
        );
        consumed += 1;

        if ch == ' ' {
            if let Some(word_len) = word_len_at(&chars, consumed) {
                // words wider than a row split wherever they land
                if word_len <= grid_cols && !policy.fits(word_len, cursor.col, grid_cols) {
                    if cursor.row + 1 < grid_rows {
                        cursor.next_row();
                        continue;
                    }

                    return consumed;
                }
            }
        }

        cursor.advance(grid_cols);
    }

    consumed
}

/// The first `capacity` characters of `text`.
pub fn truncate_chars(text: &str, capacity: usize) -> &str {
    match text.char_indices().nth(capacity) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Byte offset of the `n`th character, or the end of the string.
fn char_offset(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map_or(text.len(), |(idx, _)| idx)
}

/// One panel's worth of a message.
#[derive(Debug)]
pub struct Page<'a> {
    pub bitmap: PixelBitmap,
    /// The part of the message consumed by this page
    pub text: &'a str,
}

/// Splits a message into panel pages.
pub struct Pages<'a, G: ?Sized> {
    remaining: &'a str,
    geometry: Geometry,
    font: &'a G,
    policy: WrapPolicy,
    capacity: usize,
}

impl<'a, G> Pages<'a, G>
where
    G: GlyphSource + ?Sized,
{
    /// Capacity defaults to one character per cell.
    pub fn new(text: &'a str, geometry: Geometry, font: &'a G) -> Self {
        Self {
            remaining: text,
            geometry,
            font,
            policy: WrapPolicy::default(),
            capacity: geometry.cells(),
        }
    }

    #[must_use]
    pub fn policy(mut self, policy: WrapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upper bound on the characters handed to a single layout pass.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl<'a, G> Iterator for Pages<'a, G>
where
    G: GlyphSource + ?Sized,
{
    type Item = Result<Page<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let mut bitmap = match PixelBitmap::new(self.geometry) {
            Ok(bitmap) => bitmap,
            Err(error) => {
                self.remaining = "";
                return Some(Err(error));
            }
        };

        let snippet = truncate_chars(self.remaining, self.capacity);
        let consumed = layout_text(snippet, &mut bitmap, self.font, self.policy);
        if consumed == 0 {
            warn!(remaining = self.remaining.len(), "page layout made no progress");
            self.remaining = "";
            return None;
        }

        let (text, rest) = self.remaining.split_at(char_offset(snippet, consumed));
        self.remaining = rest;

        Some(Ok(Page { bitmap, text }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BLANK;

    /// Every character renders as its own code in the first glyph row, which
    /// makes the cell each character landed in readable back off the bitmap.
    fn code_font(ch: char) -> Glyph {
        if ch == ' ' {
            return BLANK;
        }
        let mut glyph = BLANK;
        glyph[0] = ch as u8;
        glyph
    }

    fn grid(grid_rows: usize, grid_cols: usize) -> PixelBitmap {
        PixelBitmap::new(Geometry::new(grid_rows * 8, grid_cols * 8).unwrap()).unwrap()
    }

    fn cell(bitmap: &PixelBitmap, row: usize, col: usize) -> char {
        let mut code = 0u8;
        for j in 0..8 {
            if bitmap.get(row * 8, col * 8 + j).unwrap() {
                code |= 1 << j;
            }
        }
        if code == 0 { ' ' } else { code as char }
    }

    fn rows_of(bitmap: &PixelBitmap) -> Vec<String> {
        (0..bitmap.rows() / 8)
            .map(|row| (0..bitmap.cols() / 8).map(|col| cell(bitmap, row, col)).collect())
            .collect()
    }

    fn lay_out(
        text: &str,
        grid_rows: usize,
        grid_cols: usize,
        policy: WrapPolicy,
    ) -> (usize, Vec<String>) {
        let mut bitmap = grid(grid_rows, grid_cols);
        let consumed = layout_text(text, &mut bitmap, &code_font, policy);
        (consumed, rows_of(&bitmap))
    }

    #[test]
    fn glyph_lands_in_cell() {
        let mut bitmap = grid(2, 2);
        let glyph = [0b0000_0001, 0, 0, 0, 0, 0, 0, 0b1000_0000];
        rasterize_glyph(&mut bitmap, 8, 8, &glyph);

        assert_eq!(bitmap.get(8, 8), Some(true));
        assert_eq!(bitmap.get(15, 15), Some(true));
        assert_eq!(bitmap.get(8, 9), Some(false));
        assert!(bitmap.as_bytes()[..16].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn rasterizing_clears_previous_pixels() {
        let mut bitmap = grid(1, 1);
        rasterize_glyph(&mut bitmap, 0, 0, &[0xff; 8]);
        rasterize_glyph(&mut bitmap, 0, 0, &BLANK);

        assert!(bitmap.as_bytes().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn word_that_misses_the_row_moves_down() {
        let (consumed, rows) = lay_out("a bb ccc", 2, 3, WrapPolicy::Exact);

        assert_eq!(rows, ["a  ", "bb "]);
        // "ccc" needs a full row and there is none left
        assert_eq!(consumed, 5);
    }

    #[test]
    fn leading_spaces_are_dropped() {
        let (consumed, rows) = lay_out("  hi", 1, 4, WrapPolicy::Exact);

        assert_eq!(rows, ["hi  "]);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn word_exactly_filling_the_row() {
        // after "ab " two cells remain, exactly "cd"
        let (consumed, rows) = lay_out("ab cd", 2, 5, WrapPolicy::Exact);
        assert_eq!(rows, ["ab cd", "     "]);
        assert_eq!(consumed, 5);

        let (consumed, rows) = lay_out("ab cd", 2, 5, WrapPolicy::KeepSpare);
        assert_eq!(rows, ["ab   ", "cd   "]);
        assert_eq!(consumed, 5);
    }

    #[test]
    fn word_one_shorter_than_the_rest_of_the_row() {
        let (_, rows) = lay_out("ab c", 2, 5, WrapPolicy::KeepSpare);
        assert_eq!(rows, ["ab c ", "     "]);
    }

    #[test]
    fn long_words_split_across_rows() {
        let (consumed, rows) = lay_out("a bcdefg", 2, 4, WrapPolicy::Exact);

        assert_eq!(rows, ["a bc", "defg"]);
        assert_eq!(consumed, 8);
    }

    #[test]
    fn row_full_wraps_to_next_row() {
        let (consumed, rows) = lay_out("abcdef", 2, 3, WrapPolicy::Exact);

        assert_eq!(rows, ["abc", "def"]);
        assert_eq!(consumed, 6);
    }

    #[test]
    fn stops_when_the_grid_is_full() {
        let (consumed, rows) = lay_out("abcdefgh", 2, 3, WrapPolicy::Exact);

        assert_eq!(rows, ["abc", "def"]);
        assert_eq!(consumed, 6);
    }

    #[test]
    fn trailing_blanks_after_a_full_grid_are_consumed() {
        let (consumed, _) = lay_out("abcdef  ", 2, 3, WrapPolicy::Exact);
        assert_eq!(consumed, 8);
    }

    #[test]
    fn word_len_scan() {
        let chars: Vec<char> = "ab cde f".chars().collect();
        assert_eq!(word_len_at(&chars, 0), Some(2));
        assert_eq!(word_len_at(&chars, 2), None);
        assert_eq!(word_len_at(&chars, 3), Some(3));
        assert_eq!(word_len_at(&chars, 7), Some(1));
        assert_eq!(word_len_at(&chars, 8), None);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("grüße", 3), "grü");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn pagination_covers_the_whole_message() {
        let geometry = Geometry::new(16, 32).unwrap();
        let message = "the quick brown fox jumps over the lazy dog";

        let pages: Vec<_> = Pages::new(message, geometry, &code_font)
            .collect::<Result<_>>()
            .unwrap();

        assert!(pages.len() > 1);
        assert!(pages[0].text.chars().count() < message.chars().count());
        let joined: String = pages.iter().map(|page| page.text).collect();
        assert_eq!(joined, message);

        let rendered: Vec<Vec<String>> = pages.iter().map(|page| rows_of(&page.bitmap)).collect();
        assert_eq!(rendered[0], ["the ", "quic"]);
        // "brown" is wider than a row, so it splits instead of wrapping
        assert_eq!(rendered[1], ["k br", "own "]);
    }

    #[test]
    fn resuming_from_the_remainder_drops_nothing() {
        let message = "one two three four five six";
        let mut first = grid(2, 6);
        let consumed = layout_text(message, &mut first, &code_font, WrapPolicy::Exact);
        assert!(consumed < message.len());

        let mut second = grid(2, 6);
        let rest = &message[consumed..];
        let rest_consumed = layout_text(rest, &mut second, &code_font, WrapPolicy::Exact);

        let rendered: String = rows_of(&first)
            .into_iter()
            .chain(rows_of(&second))
            .collect::<Vec<_>>()
            .join(" ");
        let words: Vec<&str> = rendered.split_whitespace().collect();
        let expected: Vec<&str> = message[..consumed + rest_consumed].split_whitespace().collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn capacity_bounds_each_page() {
        let geometry = Geometry::new(16, 96).unwrap();
        let pages: Vec<_> = Pages::new("abcdefghij", geometry, &code_font)
            .capacity(4)
            .collect::<Result<_>>()
            .unwrap();

        let texts: Vec<&str> = pages.iter().map(|page| page.text).collect();
        assert_eq!(texts, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn zero_capacity_yields_nothing() {
        let geometry = Geometry::new(8, 8).unwrap();
        let mut pages = Pages::new("abc", geometry, &code_font).capacity(0);

        assert!(pages.next().is_none());
    }
}
