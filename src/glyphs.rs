use font8x8::UnicodeFonts;
use image::{GrayImage, Luma};

use crate::error::{AppError, Result};

/// Printable ASCII ordered from least to most ink, as measured from a
/// rendered glyph sheet.
pub const DEFAULT_RAMP: &str =
    r#"`.',_-:~;"!^+/\><)(|=Lv?[]Ttr7}{izlcxfIYjnuJsF14*yoVaehk2PZ96CAEXU3qpwHmbKd5SO#D@RGNg&8B0W%QM$"#;

pub const FIRST_PRINTABLE: u32 = 33;
pub const PRINTABLE_COUNT: u32 = 94;

const GLYPH_SIZE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    chars: Vec<char>,
}

impl Palette {
    pub fn new(ramp: &str) -> Result<Self> {
        let chars: Vec<char> = ramp.chars().collect();
        if chars.is_empty() {
            return Err(AppError::InvalidPalette(
                "needs at least one character".to_string(),
            ));
        }
        // A control character would split or distort the frame grid.
        if let Some(ch) = chars.iter().find(|ch| ch.is_control()) {
            return Err(AppError::InvalidPalette(format!(
                "control character {ch:?} is not printable"
            )));
        }

        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Palette index for a luminance sample: `floor(luma * (P - 1) / 255)`.
    pub fn index(&self, luma: u8) -> usize {
        let last = self.chars.len().saturating_sub(1);
        (luma as usize * last) / 255
    }

    pub fn glyph(&self, luma: u8) -> char {
        self.chars[self.index(luma)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            chars: DEFAULT_RAMP.chars().collect(),
        }
    }
}

/// Draws `count` glyphs of the built-in 8x8 font, starting at `first_code`,
/// light-on-dark in a grid `columns` wide.
pub fn render_sheet(columns: u32, first_code: u32, count: u32) -> GrayImage {
    let columns = columns.max(1);
    let rows = count.div_ceil(columns).max(1);
    let mut sheet = GrayImage::from_pixel(columns * GLYPH_SIZE, rows * GLYPH_SIZE, Luma([0]));

    for offset in 0..count {
        let Some(ch) = char::from_u32(first_code + offset) else {
            continue;
        };
        let x = (offset % columns) * GLYPH_SIZE;
        let y = (offset / columns) * GLYPH_SIZE;
        draw_glyph(&mut sheet, x, y, ch);
    }

    sheet
}

fn draw_glyph(canvas: &mut GrayImage, x: u32, y: u32, ch: char) {
    let Some(glyph) = font8x8::BASIC_FONTS.get(ch) else {
        return;
    };

    for (gy, row_bits) in glyph.iter().enumerate() {
        for gx in 0..GLYPH_SIZE {
            if (row_bits >> gx) & 1 == 1 {
                canvas.put_pixel(x + gx, y + gy as u32, Luma([255]));
            }
        }
    }
}

/// Ranks the glyphs of a light-on-dark sheet by total brightness.
///
/// The sheet is cut into `columns x rows` equal cells read row by row; the
/// cell at position `i` holds the character with code `first_code + i`.
/// Ties keep sheet order.
pub fn rank_sheet(sheet: &GrayImage, columns: u32, rows: u32, first_code: u32) -> Result<String> {
    if columns == 0 || rows == 0 {
        return Err(AppError::InvalidGlyphSheet(
            "columns and rows must be positive".to_string(),
        ));
    }

    let cell_width = sheet.width() / columns;
    let cell_height = sheet.height() / rows;
    if cell_width == 0 || cell_height == 0 {
        return Err(AppError::InvalidGlyphSheet(format!(
            "{}x{} image cannot hold a {columns}x{rows} grid",
            sheet.width(),
            sheet.height()
        )));
    }

    let mut ranked = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        for col in 0..columns {
            let code = first_code + row * columns + col;
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            let sum = cell_sum(sheet, col * cell_width, row * cell_height, cell_width, cell_height);
            ranked.push((sum, ch));
        }
    }

    ranked.sort_by_key(|(sum, _)| *sum);
    Ok(ranked.into_iter().map(|(_, ch)| ch).collect())
}

fn cell_sum(image: &GrayImage, x0: u32, y0: u32, width: u32, height: u32) -> u64 {
    let mut sum = 0u64;
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            sum += image.get_pixel(x, y)[0] as u64;
        }
    }
    sum
}

pub fn rank_builtin() -> String {
    let mut ranked: Vec<(u32, char)> = (FIRST_PRINTABLE..FIRST_PRINTABLE + PRINTABLE_COUNT)
        .filter_map(char::from_u32)
        .map(|ch| {
            let lit = font8x8::BASIC_FONTS
                .get(ch)
                .map(|glyph| glyph.iter().map(|row| row.count_ones()).sum::<u32>())
                .unwrap_or(0);
            (lit, ch)
        })
        .collect();

    ranked.sort_by_key(|(lit, _)| *lit);
    ranked.into_iter().map(|(_, ch)| ch).collect()
}
