use crate::color::ColorMode;
use crate::error::{ConvertError, Result};
use crate::font::MonospaceFont;
use crate::lut::get_ramp_char;
use image::{GrayImage, Rgb, RgbImage, imageops};
use log::debug;
use rayon::prelude::*;
use std::borrow::Cow;

/// Background behind the glyphs: a dark neutral gray rather than black
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([32, 32, 32]);

/// Map a grayscale image to lines of ASCII characters
///
/// One character per pixel, looked up in the density ramp. Rows are mapped
/// in parallel but returned in order: row 0 first, leftmost column first.
///
/// # Arguments
/// * `gray` - Grayscale intensity grid
///
/// # Returns
/// One `String` per image row, each `gray.width()` characters long
pub fn map_to_ascii(gray: &GrayImage) -> Vec<String> {
    let (width, height) = gray.dimensions();

    (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| get_ramp_char(gray.get_pixel(x, y)[0]))
                .collect::<String>()
        })
        .collect()
}

/// Size of the rendered canvas for a character grid
///
/// The width is exactly `cell_width * columns`. The height follows the
/// original image's aspect ratio instead of `cell_height * rows`.
///
/// # Arguments
/// * `columns` - Characters per line
/// * `cell_width` - Glyph cell width in pixels
/// * `original_size` - Width and height of the image before resizing
pub fn canvas_size(columns: u32, cell_width: u32, original_size: (u32, u32)) -> (u32, u32) {
    let (orig_width, orig_height) = original_size;
    let width = cell_width * columns;
    let aspect = orig_height as f64 / orig_width.max(1) as f64;
    let height = (width as f64 * aspect).round().max(1.0) as u32;
    (width, height)
}

/// Render ASCII lines to an image, coloring each glyph from a source image
///
/// Glyphs are laid out on a fixed monospace grid horizontally. Rows are spread
/// evenly over the canvas height, so row `r` starts at
/// `round(r * canvas_height / rows)`.
///
/// # Arguments
/// * `lines` - Character grid, one string per row, all the same length
/// * `colors` - Color source, resampled to one pixel per character if needed
/// * `original_size` - Pre-resize image size, which fixes the canvas aspect ratio
/// * `color_mode` - Transform applied to each sampled color
/// * `font` - Font providing the cell size and glyph shapes
///
/// # Errors
/// [`ConvertError::EmptyResult`] if the grid has no rows or no columns
pub fn render_ascii_to_image(
    lines: &[String],
    colors: &RgbImage,
    original_size: (u32, u32),
    color_mode: ColorMode,
    font: &dyn MonospaceFont,
) -> Result<RgbImage> {
    let rows = lines.len() as u32;
    let columns = lines.first().map_or(0, |line| line.chars().count()) as u32;
    if rows == 0 || columns == 0 {
        return Err(ConvertError::EmptyResult { columns, rows });
    }

    let (cell_width, cell_height) = font.cell_size();
    let (width, height) = canvas_size(columns, cell_width, original_size);
    debug!(
        "Rendering {}x{} grid with {}x{} cells onto {}x{} canvas (row pitch {:.2}px)",
        columns,
        rows,
        cell_width,
        cell_height,
        width,
        height,
        height as f64 / rows as f64
    );

    // One representative color per character cell
    let samples: Cow<'_, RgbImage> = if colors.dimensions() == (columns, rows) {
        Cow::Borrowed(colors)
    } else {
        Cow::Owned(imageops::resize(
            colors,
            columns,
            rows,
            imageops::FilterType::Triangle,
        ))
    };

    let mut output = RgbImage::from_pixel(width, height, BACKGROUND_COLOR);

    for (row, line) in lines.iter().enumerate() {
        let y = (row as f64 * height as f64 / rows as f64).round() as i32;

        for (col, ch) in line.chars().take(columns as usize).enumerate() {
            let x = (col as u32 * cell_width) as i32;
            let color = color_mode.apply(*samples.get_pixel(col as u32, row as u32));
            font.draw_char(&mut output, ch, x, y, color);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFont;
    use crate::lut::{RAMP_CHARS, ramp_index};
    use image::Luma;

    #[test]
    fn test_map_to_ascii_dimensions_and_order() {
        let mut gray = GrayImage::new(3, 2);
        gray.put_pixel(0, 0, Luma([0]));
        gray.put_pixel(2, 0, Luma([255]));
        gray.put_pixel(0, 1, Luma([255]));

        let lines = map_to_ascii(&gray);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 3));
        assert!(lines[0].starts_with(RAMP_CHARS[0]));
        assert!(lines[0].ends_with(' '));
        assert!(lines[1].starts_with(' '));
        assert!(lines[1].ends_with(RAMP_CHARS[0]));
    }

    #[test]
    fn test_map_to_ascii_gradient_is_monotonic() {
        let mut gray = GrayImage::new(256, 1);
        for x in 0..256 {
            gray.put_pixel(x, 0, Luma([x as u8]));
        }
        let line = &map_to_ascii(&gray)[0];
        // The ramp repeats a character, so compare against the index each
        // intensity maps to instead of searching the ramp
        for (x, ch) in line.chars().enumerate() {
            assert_eq!(ch, RAMP_CHARS[ramp_index(x as u8)]);
        }
        let indices: Vec<usize> = (0..=255u8).map(ramp_index).collect();
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_canvas_size_follows_original_aspect() {
        // 4:3 landscape, 10 columns of 8px cells
        assert_eq!(canvas_size(10, 8, (400, 300)), (80, 60));
        // portrait
        assert_eq!(canvas_size(3, 7, (100, 250)), (21, 53));
    }

    #[test]
    fn test_render_dimensions() {
        let lines = vec!["@@@@".to_string(), "....".to_string()];
        let colors = RgbImage::from_pixel(4, 2, Rgb([200, 100, 50]));
        let img = render_ascii_to_image(
            &lines,
            &colors,
            (40, 30),
            ColorMode::TrueColor,
            &BitmapFont::default(),
        )
        .unwrap();
        assert_eq!(img.dimensions(), (32, 24));
    }

    #[test]
    fn test_render_background_and_glyph_colors() {
        let lines = vec!["@ ".to_string()];
        let colors = RgbImage::from_pixel(2, 1, Rgb([200, 100, 50]));
        let img = render_ascii_to_image(
            &lines,
            &colors,
            (2, 1),
            ColorMode::TrueColor,
            &BitmapFont::default(),
        )
        .unwrap();

        // The '@' cell carries the sampled color, the space cell stays background
        let left = img
            .enumerate_pixels()
            .filter(|(x, _, p)| *x < 8 && **p == Rgb([200, 100, 50]))
            .count();
        let right = img
            .enumerate_pixels()
            .filter(|(x, _, p)| *x >= 8 && **p != BACKGROUND_COLOR)
            .count();
        assert!(left > 0);
        assert_eq!(right, 0);
    }

    #[test]
    fn test_render_rows_follow_canvas_height() {
        // Tall original: the canvas is 8x40, not the 8x24 a plain stack of
        // three 8px rows would need
        let lines = vec!["#".to_string(), "#".to_string(), "#".to_string()];
        let row_colors = [Rgb([255, 0, 0]), Rgb([0, 255, 0]), Rgb([0, 0, 255])];
        let mut colors = RgbImage::new(1, 3);
        for (row, color) in row_colors.iter().enumerate() {
            colors.put_pixel(0, row as u32, *color);
        }

        let img = render_ascii_to_image(
            &lines,
            &colors,
            (1, 5),
            ColorMode::TrueColor,
            &BitmapFont::default(),
        )
        .unwrap();
        assert_eq!(img.dimensions(), (8, 40));

        for (row, color) in row_colors.iter().enumerate() {
            let first_lit = img
                .enumerate_pixels()
                .filter(|(_, _, p)| *p == color)
                .map(|(_, y, _)| y)
                .min()
                .unwrap();
            let expected = (row as f64 * 40.0 / 3.0).round() as u32;
            assert_eq!(first_lit, expected, "row {row}");
        }
        // 0, 13, 27 rather than 0, 8, 16
        assert_eq!(
            row_colors
                .iter()
                .map(|c| img.enumerate_pixels().find(|(_, _, p)| *p == c).unwrap().1)
                .collect::<Vec<_>>(),
            vec![0, 13, 27]
        );
    }

    #[test]
    fn test_render_applies_color_mode() {
        let lines = vec!["#".to_string()];
        let colors = RgbImage::from_pixel(1, 1, Rgb([30, 60, 90]));
        let img = render_ascii_to_image(
            &lines,
            &colors,
            (1, 1),
            ColorMode::Grayscale,
            &BitmapFont::default(),
        )
        .unwrap();
        assert!(img.pixels().any(|p| *p == Rgb([60, 60, 60])));
        assert!(img.pixels().all(|p| *p == Rgb([60, 60, 60]) || *p == BACKGROUND_COLOR));
    }

    #[test]
    fn test_render_resamples_mismatched_colors() {
        let lines = vec!["##".to_string(), "##".to_string()];
        let colors = RgbImage::from_pixel(10, 10, Rgb([0, 255, 0]));
        let img = render_ascii_to_image(
            &lines,
            &colors,
            (10, 10),
            ColorMode::TrueColor,
            &BitmapFont::default(),
        )
        .unwrap();
        assert!(img.pixels().any(|p| *p == Rgb([0, 255, 0])));
    }

    #[test]
    fn test_render_empty_grid_fails() {
        let colors = RgbImage::new(1, 1);
        let font = BitmapFont::default();

        let no_rows = render_ascii_to_image(&[], &colors, (1, 1), ColorMode::TrueColor, &font);
        assert!(matches!(
            no_rows,
            Err(ConvertError::EmptyResult { rows: 0, .. })
        ));

        let no_columns = render_ascii_to_image(
            &[String::new()],
            &colors,
            (1, 1),
            ColorMode::TrueColor,
            &font,
        );
        assert!(matches!(
            no_columns,
            Err(ConvertError::EmptyResult { columns: 0, .. })
        ));
    }
}
