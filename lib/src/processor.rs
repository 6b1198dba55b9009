use crate::ascii::{map_to_ascii, render_ascii_to_image};
use crate::config::ConversionConfig;
use crate::error::{ConvertError, Result};
use crate::filters::{adjust_tone, calculate_luminance};
use crate::font::{MonospaceFont, load_font};
use crate::loader::{ImageSource, load_rgb};
use image::{ImageFormat, RgbImage, imageops};
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// Result of a conversion: the character grid and its rendered bitmap
///
/// Both come from the same tone-adjusted frame. `lines` has one entry per
/// resized row, each exactly `output_width` characters long.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiArt {
    pub lines: Vec<String>,
    pub image: RgbImage,
    /// Size of the source image before resizing
    pub original_size: (u32, u32),
}

impl AsciiArt {
    /// The ASCII art as one string, rows separated by `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Characters per line
    pub fn columns(&self) -> u32 {
        self.lines.first().map_or(0, |line| line.chars().count()) as u32
    }

    /// Number of lines
    pub fn rows(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Write the ASCII text to a file
    pub fn save_text(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.text())?;
        Ok(())
    }

    /// Save the rendered bitmap, format chosen from the file extension
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    /// Encode the rendered bitmap into an in-memory buffer
    pub fn encode(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, format)?;
        Ok(buf.into_inner())
    }
}

/// Target height for resizing to `width` columns, preserving aspect ratio
///
/// `round(width * height / original_width)`.
///
/// # Errors
/// [`ConvertError::InvalidImage`] if the original width is zero
pub fn target_height(original_size: (u32, u32), width: u32) -> Result<u32> {
    let (orig_width, orig_height) = original_size;
    if orig_width == 0 {
        return Err(ConvertError::InvalidImage {
            width: orig_width,
            height: orig_height,
        });
    }
    Ok((width as f64 * orig_height as f64 / orig_width as f64).round() as u32)
}

/// Resize an image to `width` pixels wide, preserving its aspect ratio
///
/// Uses bilinear (triangle) filtering. An image already at the target size is
/// returned as a copy without resampling.
///
/// # Errors
/// * [`ConvertError::InvalidImage`] if the input has zero width
/// * [`ConvertError::EmptyResult`] if the aspect ratio rounds the height to zero
pub fn resize_to_width(input: &RgbImage, width: u32) -> Result<RgbImage> {
    let height = target_height(input.dimensions(), width)?;
    if width == 0 || height == 0 {
        return Err(ConvertError::EmptyResult {
            columns: width,
            rows: height,
        });
    }

    if input.dimensions() == (width, height) {
        return Ok(input.clone());
    }

    Ok(imageops::resize(
        input,
        width,
        height,
        imageops::FilterType::Triangle,
    ))
}

/// Reusable converter holding a validated config and its resolved font
///
/// Loading the font once lets the same converter process many images. The
/// converter holds no mutable state and can be shared between threads.
pub struct AsciiConverter {
    config: ConversionConfig,
    font: Box<dyn MonospaceFont>,
}

impl std::fmt::Debug for AsciiConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsciiConverter")
            .field("config", &self.config)
            .field("cell_size", &self.font.cell_size())
            .finish()
    }
}

impl AsciiConverter {
    /// Validate the config and resolve its font
    ///
    /// A missing or broken font file is not an error; the built-in bitmap
    /// font is used instead.
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate().map_err(ConvertError::InvalidConfig)?;
        let font = load_font(&config.font);
        Ok(Self { config, font })
    }

    /// Use a specific font instead of resolving one from the config
    pub fn with_font(config: ConversionConfig, font: Box<dyn MonospaceFont>) -> Result<Self> {
        config.validate().map_err(ConvertError::InvalidConfig)?;
        Ok(Self { config, font })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Glyph cell size of the resolved font
    pub fn cell_size(&self) -> (u32, u32) {
        self.font.cell_size()
    }

    /// Converts an image to colored ASCII art
    ///
    /// Pipeline:
    /// 1. Load and normalize to 8-bit RGB
    /// 2. Resize to `output_width` columns, keeping the aspect ratio
    /// 3. Adjust contrast and brightness around the global mean
    /// 4. Convert to luma and map each pixel to a ramp character
    /// 5. Render the characters, colored from the adjusted frame
    ///
    /// Steps 4 and 5 both read the same adjusted frame, so glyph colors match
    /// the values that picked each character.
    pub fn convert<'a>(&self, source: impl Into<ImageSource<'a>>) -> Result<AsciiArt> {
        let config = &self.config;

        // Step 1: Load
        let input = load_rgb(source.into())?;
        let original_size = input.dimensions();

        // Step 2: Resize
        let resized = resize_to_width(&input, config.output_width)?;
        drop(input);
        debug!(
            "Resized {}x{} to {}x{}",
            original_size.0,
            original_size.1,
            resized.width(),
            resized.height()
        );

        // Step 3: Tone adjustment
        let adjusted = adjust_tone(&resized, config.contrast, config.brightness);
        drop(resized);

        // Step 4: Density mapping
        let lum = calculate_luminance(&adjusted);
        let lines = map_to_ascii(&lum);

        // Step 5: Render
        let image = render_ascii_to_image(
            &lines,
            &adjusted,
            original_size,
            config.color_mode,
            self.font.as_ref(),
        )?;

        Ok(AsciiArt {
            lines,
            image,
            original_size,
        })
    }
}

/// Converts an image to colored ASCII art in one call
///
/// Builds an [`AsciiConverter`] for `config` and runs it once. Prefer the
/// converter when processing several images with the same settings.
///
/// # Arguments
/// * `source` - Decoded image, path, or encoded bytes
/// * `config` - Conversion parameters
///
/// # Errors
/// * [`ConvertError::Load`] for a missing or undecodable input
/// * [`ConvertError::InvalidImage`] for a zero-dimension image
/// * [`ConvertError::EmptyResult`] if the character grid comes out empty
/// * [`ConvertError::InvalidConfig`] if `config` fails validation
pub fn convert<'a>(
    source: impl Into<ImageSource<'a>>,
    config: &ConversionConfig,
) -> Result<AsciiArt> {
    AsciiConverter::new(config.clone())?.convert(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFont;
    use crate::lut::RAMP_CHARS;
    use image::Rgb;

    fn converter(width: u32) -> AsciiConverter {
        let config = ConversionConfig {
            output_width: width,
            ..Default::default()
        };
        AsciiConverter::with_font(config, Box::new(BitmapFont::default())).unwrap()
    }

    #[test]
    fn test_target_height_rounds() {
        assert_eq!(target_height((100, 50), 10).unwrap(), 5);
        assert_eq!(target_height((3, 2), 4).unwrap(), 3); // 2.67 -> 3
        assert_eq!(target_height((4, 3), 2).unwrap(), 2); // 1.5 -> 2
        assert!(matches!(
            target_height((0, 10), 10),
            Err(ConvertError::InvalidImage { width: 0, .. })
        ));
    }

    #[test]
    fn test_resize_to_width_no_resize() {
        let img = RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]));
        let resized = resize_to_width(&img, 2).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_to_width_keeps_aspect() {
        let img = RgbImage::new(127, 85);
        let resized = resize_to_width(&img, 60).unwrap();
        assert_eq!(resized.dimensions(), (60, 40)); // 40.16 -> 40
    }

    #[test]
    fn test_resize_to_width_degenerate_height() {
        let img = RgbImage::new(1000, 1);
        let result = resize_to_width(&img, 10);
        assert!(matches!(result, Err(ConvertError::EmptyResult { rows: 0, .. })));
    }

    #[test]
    fn test_white_image_maps_to_lightest_char() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        let art = converter(2).convert(&img).unwrap();
        let last = RAMP_CHARS[RAMP_CHARS.len() - 1];
        assert_eq!(art.lines, vec![last.to_string().repeat(2); 2]);
    }

    #[test]
    fn test_black_pixel_maps_to_darkest_char() {
        let img = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));
        let art = converter(1).convert(&img).unwrap();
        assert_eq!(art.lines, vec![RAMP_CHARS[0].to_string()]);
    }

    #[test]
    fn test_convert_dimensions() {
        let img = RgbImage::from_pixel(400, 300, Rgb([120, 80, 40]));
        let art = converter(40).convert(&img).unwrap();
        assert_eq!(art.columns(), 40);
        assert_eq!(art.rows(), 30);
        assert_eq!(art.image.dimensions(), (320, 240));
        assert_eq!(art.original_size, (400, 300));
        assert_eq!(art.text().lines().count(), 30);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ConversionConfig {
            contrast: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            AsciiConverter::new(config),
            Err(ConvertError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_encode_png_signature() {
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 200, 10]));
        let art = converter(4).convert(&img).unwrap();
        let bytes = art.encode(ImageFormat::Png).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AsciiConverter>();
    }
}
