//! Glyph metrics and rasterization for the rendered bitmap
//!
//! Fonts are resolved in order: the requested TrueType file, then the first
//! well-known system monospace font that loads, then the built-in 8x8 bitmap
//! font. Rendering never fails for lack of a font.

use crate::config::FontSpec;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use log::{debug, warn};
use std::path::Path;
use thiserror::Error;

/// A fixed-cell font that can draw single characters onto a canvas
pub trait MonospaceFont: Send + Sync {
    /// Width and height in pixels of one character cell
    fn cell_size(&self) -> (u32, u32);

    /// Draw `ch` with its cell's top-left corner at `(x, y)`
    ///
    /// Pixels falling outside the canvas are skipped.
    fn draw_char(&self, canvas: &mut RgbImage, ch: char, x: i32, y: i32, color: Rgb<u8>);
}

/// Errors loading a TrueType font
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse font: {0}")]
    Parse(#[from] ab_glyph::InvalidFont),
}

/// Monospace fonts commonly installed on Linux, macOS and Windows
pub const SYSTEM_MONOSPACE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/Courier_New.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/cour.ttf",
    "/Library/Fonts/Courier New.ttf",
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    r"C:\Windows\Fonts\cour.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    r"C:\Windows\Fonts\consola.ttf",
];

/// Resolve the font for a [`FontSpec`]
///
/// Never fails: the requested file is tried first, then (if enabled) the
/// system fonts in [`SYSTEM_MONOSPACE_FONTS`], then the built-in bitmap font
/// at the closest integer scale. Each failed candidate is logged.
pub fn load_font(spec: &FontSpec) -> Box<dyn MonospaceFont> {
    if let Some(path) = &spec.path {
        match TrueTypeFont::from_file(path, spec.size) {
            Ok(font) => {
                debug!(
                    "Loaded font {} with {:?} px cells",
                    path.display(),
                    font.cell_size()
                );
                return Box::new(font);
            }
            Err(e) => {
                warn!("Font {} unavailable ({})", path.display(), e);
            }
        }
    }

    if spec.system_fallback
        && let Some(font) = load_system_font(spec.size)
    {
        return Box::new(font);
    }

    debug!("Using built-in bitmap font at size {}", spec.size);
    Box::new(BitmapFont::for_size(spec.size))
}

/// First entry of [`SYSTEM_MONOSPACE_FONTS`] that exists and parses
pub fn load_system_font(size: f32) -> Option<TrueTypeFont> {
    SYSTEM_MONOSPACE_FONTS
        .iter()
        .map(Path::new)
        .filter(|path| path.is_file())
        .find_map(|path| match TrueTypeFont::from_file(path, size) {
            Ok(font) => {
                debug!(
                    "Loaded system font {} with {:?} px cells",
                    path.display(),
                    font.cell_size()
                );
                Some(font)
            }
            Err(e) => {
                warn!("System font {} unusable ({})", path.display(), e);
                None
            }
        })
}

/// A scalable TrueType/OpenType font rendered through `ab_glyph`
pub struct TrueTypeFont {
    font: FontVec,
    scale: PxScale,
    cell: (u32, u32),
}

impl TrueTypeFont {
    /// Load a font file and compute its cell metrics at `size` pixels
    pub fn from_file(path: &Path, size: f32) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data, size)
    }

    /// Parse font data and compute its cell metrics at `size` pixels
    ///
    /// The cell is the advance width of `'A'` by ascent minus descent.
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self, FontError> {
        let font = FontVec::try_from_vec(data)?;
        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);

        let width = scaled.h_advance(scaled.glyph_id('A')).ceil().max(1.0) as u32;
        let height = (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32;

        Ok(Self {
            font,
            scale,
            cell: (width, height),
        })
    }
}

impl MonospaceFont for TrueTypeFont {
    fn cell_size(&self) -> (u32, u32) {
        self.cell
    }

    fn draw_char(&self, canvas: &mut RgbImage, ch: char, x: i32, y: i32, color: Rgb<u8>) {
        if ch.is_whitespace() {
            return;
        }
        let mut buf = [0u8; 4];
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, ch.encode_utf8(&mut buf));
    }
}

/// Built-in 8x8 bitmap font covering printable ASCII
///
/// Each glyph pixel is drawn as a `scale`x`scale` block, so the cell is
/// `8 * scale` pixels square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self { scale: 1 }
    }
}

impl BitmapFont {
    /// Bitmap font with an explicit integer scale (at least 1)
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    /// Bitmap font scaled to roughly match a requested pixel size
    pub fn for_size(size: f32) -> Self {
        let scale = (size / GLYPH_SIZE as f32).round();
        Self::new(if scale.is_finite() { scale as u32 } else { 1 })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl MonospaceFont for BitmapFont {
    fn cell_size(&self) -> (u32, u32) {
        (GLYPH_SIZE * self.scale, GLYPH_SIZE * self.scale)
    }

    fn draw_char(&self, canvas: &mut RgbImage, ch: char, x: i32, y: i32, color: Rgb<u8>) {
        let pattern = glyph_pattern(ch);
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);
        let scale = self.scale as i32;

        for (row, &bits) in pattern.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if (bits >> (7 - col)) & 1 == 0 {
                    continue;
                }
                let px0 = x + col as i32 * scale;
                let py0 = y + row as i32 * scale;
                for py in py0..py0 + scale {
                    for px in px0..px0 + scale {
                        if px >= 0 && py >= 0 && px < width && py < height {
                            canvas.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// Side length of a bitmap glyph in font pixels
pub const GLYPH_SIZE: u32 = 8;

/// Pattern used for characters outside printable ASCII
const UNKNOWN_GLYPH: [u8; 8] = [0x7E, 0x81, 0xA5, 0x81, 0xBD, 0x99, 0x81, 0x7E];

/// Row bitmaps for a character, most significant bit leftmost
pub fn glyph_pattern(ch: char) -> [u8; 8] {
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        FONT8X8_PRINTABLE[(code - 0x20) as usize]
    } else {
        UNKNOWN_GLYPH
    }
}

/// 8x8 glyphs for U+0020 through U+007E, after the public domain font8x8 set
const FONT8X8_PRINTABLE: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // !
    [0x6C, 0x6C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // "
    [0x6C, 0x6C, 0xFE, 0x6C, 0xFE, 0x6C, 0x6C, 0x00], // #
    [0x30, 0x7C, 0xC0, 0x78, 0x0C, 0xF8, 0x30, 0x00], // $
    [0x00, 0xC6, 0xCC, 0x18, 0x30, 0x66, 0xC6, 0x00], // %
    [0x38, 0x6C, 0x38, 0x76, 0xDC, 0xCC, 0x76, 0x00], // &
    [0x60, 0x60, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x18, 0x30, 0x60, 0x60, 0x60, 0x30, 0x18, 0x00], // (
    [0x60, 0x30, 0x18, 0x18, 0x18, 0x30, 0x60, 0x00], // )
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // *
    [0x00, 0x30, 0x30, 0xFC, 0x30, 0x30, 0x00, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x60], // ,
    [0x00, 0x00, 0x00, 0xFC, 0x00, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x00], // .
    [0x06, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0x80, 0x00], // /
    [0x7C, 0xC6, 0xCE, 0xDE, 0xF6, 0xE6, 0x7C, 0x00], // 0
    [0x30, 0x70, 0x30, 0x30, 0x30, 0x30, 0xFC, 0x00], // 1
    [0x78, 0xCC, 0x0C, 0x38, 0x60, 0xCC, 0xFC, 0x00], // 2
    [0x78, 0xCC, 0x0C, 0x38, 0x0C, 0xCC, 0x78, 0x00], // 3
    [0x1C, 0x3C, 0x6C, 0xCC, 0xFE, 0x0C, 0x1E, 0x00], // 4
    [0xFC, 0xC0, 0xF8, 0x0C, 0x0C, 0xCC, 0x78, 0x00], // 5
    [0x38, 0x60, 0xC0, 0xF8, 0xCC, 0xCC, 0x78, 0x00], // 6
    [0xFC, 0xCC, 0x0C, 0x18, 0x30, 0x30, 0x30, 0x00], // 7
    [0x78, 0xCC, 0xCC, 0x78, 0xCC, 0xCC, 0x78, 0x00], // 8
    [0x78, 0xCC, 0xCC, 0x7C, 0x0C, 0x18, 0x70, 0x00], // 9
    [0x00, 0x30, 0x30, 0x00, 0x00, 0x30, 0x30, 0x00], // :
    [0x00, 0x30, 0x30, 0x00, 0x00, 0x30, 0x30, 0x60], // ;
    [0x18, 0x30, 0x60, 0xC0, 0x60, 0x30, 0x18, 0x00], // <
    [0x00, 0x00, 0xFC, 0x00, 0x00, 0xFC, 0x00, 0x00], // =
    [0x60, 0x30, 0x18, 0x0C, 0x18, 0x30, 0x60, 0x00], // >
    [0x78, 0xCC, 0x0C, 0x18, 0x30, 0x00, 0x30, 0x00], // ?
    [0x7C, 0xC6, 0x8C, 0x18, 0x32, 0x66, 0xFE, 0x00], // @
    [0x30, 0x78, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0x00], // A
    [0xFC, 0x66, 0x66, 0x7C, 0x66, 0x66, 0xFC, 0x00], // B
    [0x3C, 0x66, 0xC0, 0xC0, 0xC0, 0x66, 0x3C, 0x00], // C
    [0x78, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x00], // D
    [0xFE, 0x62, 0x68, 0x78, 0x68, 0x62, 0xFE, 0x00], // E
    [0xFE, 0x62, 0x68, 0x78, 0x68, 0x60, 0xF0, 0x00], // F
    [0x3C, 0x66, 0xC0, 0xC0, 0xCE, 0x66, 0x3E, 0x00], // G
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x00], // H
    [0x78, 0x30, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // I
    [0x1E, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78, 0x00], // J
    [0xE6, 0x66, 0x6C, 0x78, 0x6C, 0x66, 0xE6, 0x00], // K
    [0xF0, 0x60, 0x60, 0x60, 0x62, 0x66, 0xFE, 0x00], // L
    [0xC6, 0xEE, 0xFE, 0xFE, 0xD6, 0xC6, 0xC6, 0x00], // M
    [0xC6, 0xE6, 0xF6, 0xDE, 0xCE, 0xC6, 0xC6, 0x00], // N
    [0x38, 0x6C, 0xC6, 0xC6, 0xC6, 0x6C, 0x38, 0x00], // O
    [0xFC, 0x66, 0x66, 0x7C, 0x60, 0x60, 0xF0, 0x00], // P
    [0x78, 0xCC, 0xCC, 0xCC, 0xDC, 0x78, 0x1C, 0x00], // Q
    [0xFC, 0x66, 0x66, 0x7C, 0x6C, 0x66, 0xE6, 0x00], // R
    [0x78, 0xCC, 0xE0, 0x70, 0x1C, 0xCC, 0x78, 0x00], // S
    [0xFC, 0xB4, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // T
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xFC, 0x00], // U
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00], // V
    [0xC6, 0xC6, 0xC6, 0xD6, 0xFE, 0xEE, 0xC6, 0x00], // W
    [0xC6, 0xC6, 0x6C, 0x38, 0x38, 0x6C, 0xC6, 0x00], // X
    [0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x30, 0x78, 0x00], // Y
    [0xFE, 0xC6, 0x8C, 0x18, 0x32, 0x66, 0xFE, 0x00], // Z
    [0x78, 0x60, 0x60, 0x60, 0x60, 0x60, 0x78, 0x00], // [
    [0xC0, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x02, 0x00], // \
    [0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0x78, 0x00], // ]
    [0x10, 0x38, 0x6C, 0xC6, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // _
    [0x30, 0x30, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x78, 0x0C, 0x7C, 0xCC, 0x76, 0x00], // a
    [0xE0, 0x60, 0x60, 0x7C, 0x66, 0x66, 0xDC, 0x00], // b
    [0x00, 0x00, 0x78, 0xCC, 0xC0, 0xCC, 0x78, 0x00], // c
    [0x1C, 0x0C, 0x0C, 0x7C, 0xCC, 0xCC, 0x76, 0x00], // d
    [0x00, 0x00, 0x78, 0xCC, 0xFC, 0xC0, 0x78, 0x00], // e
    [0x38, 0x6C, 0x60, 0xF0, 0x60, 0x60, 0xF0, 0x00], // f
    [0x00, 0x00, 0x76, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // g
    [0xE0, 0x60, 0x6C, 0x76, 0x66, 0x66, 0xE6, 0x00], // h
    [0x30, 0x00, 0x70, 0x30, 0x30, 0x30, 0x78, 0x00], // i
    [0x0C, 0x00, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78], // j
    [0xE0, 0x60, 0x66, 0x6C, 0x78, 0x6C, 0xE6, 0x00], // k
    [0x70, 0x30, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // l
    [0x00, 0x00, 0xCC, 0xFE, 0xFE, 0xD6, 0xC6, 0x00], // m
    [0x00, 0x00, 0xF8, 0xCC, 0xCC, 0xCC, 0xCC, 0x00], // n
    [0x00, 0x00, 0x78, 0xCC, 0xCC, 0xCC, 0x78, 0x00], // o
    [0x00, 0x00, 0xDC, 0x66, 0x66, 0x7C, 0x60, 0xF0], // p
    [0x00, 0x00, 0x76, 0xCC, 0xCC, 0x7C, 0x0C, 0x1E], // q
    [0x00, 0x00, 0xDC, 0x76, 0x66, 0x60, 0xF0, 0x00], // r
    [0x00, 0x00, 0x7C, 0xC0, 0x78, 0x0C, 0xF8, 0x00], // s
    [0x10, 0x30, 0x7C, 0x30, 0x30, 0x34, 0x18, 0x00], // t
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0xCC, 0x76, 0x00], // u
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00], // v
    [0x00, 0x00, 0xC6, 0xD6, 0xFE, 0xFE, 0x6C, 0x00], // w
    [0x00, 0x00, 0xC6, 0x6C, 0x38, 0x6C, 0xC6, 0x00], // x
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // y
    [0x00, 0x00, 0xFC, 0x98, 0x30, 0x64, 0xFC, 0x00], // z
    [0x1C, 0x30, 0x30, 0xE0, 0x30, 0x30, 0x1C, 0x00], // {
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // |
    [0xE0, 0x30, 0x30, 0x1C, 0x30, 0x30, 0xE0, 0x00], // }
    [0x76, 0xDC, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ~
];
