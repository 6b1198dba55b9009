//! Input normalization: every source becomes an 8-bit RGB image.

use crate::error::{ConvertError, Result};
use image::{DynamicImage, RgbImage};
use log::debug;
use std::path::{Path, PathBuf};

/// Where the image to convert comes from
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// An already decoded image of any color type
    Image(&'a DynamicImage),
    /// An already decoded 8-bit RGB image
    Rgb(&'a RgbImage),
    /// A file on disk, decoded by format guessed from its contents and extension
    Path(&'a Path),
    /// Encoded image bytes (PNG, JPEG, ...)
    Bytes(&'a [u8]),
}

impl<'a> From<&'a DynamicImage> for ImageSource<'a> {
    fn from(img: &'a DynamicImage) -> Self {
        ImageSource::Image(img)
    }
}

impl<'a> From<&'a RgbImage> for ImageSource<'a> {
    fn from(img: &'a RgbImage) -> Self {
        ImageSource::Rgb(img)
    }
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        ImageSource::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ImageSource::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for ImageSource<'a> {
    fn from(path: &'a str) -> Self {
        ImageSource::Path(Path::new(path))
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Load an image source as an 8-bit RGB image
///
/// Alpha is dropped and grayscale or 16-bit inputs are expanded/narrowed by
/// the `image` crate's standard conversion.
///
/// # Errors
/// * [`ConvertError::Load`] if a path is missing or the data cannot be decoded
/// * [`ConvertError::InvalidImage`] if the image has a zero dimension
pub fn load_rgb(source: ImageSource<'_>) -> Result<RgbImage> {
    let rgb = match source {
        ImageSource::Image(img) => img.to_rgb8(),
        ImageSource::Rgb(img) => img.clone(),
        ImageSource::Path(path) => image::open(path)
            .map_err(|source| ConvertError::Load {
                origin: path.display().to_string(),
                source,
            })?
            .into_rgb8(),
        ImageSource::Bytes(bytes) => image::load_from_memory(bytes)
            .map_err(|source| ConvertError::Load {
                origin: format!("{} bytes of memory", bytes.len()),
                source,
            })?
            .into_rgb8(),
    };

    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(ConvertError::InvalidImage { width, height });
    }

    debug!("Loaded {}x{} RGB image", width, height);
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma, Rgb, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_missing_path_is_load_error() {
        let result = load_rgb(ImageSource::from("nonexistent/path.png"));
        assert!(matches!(result, Err(ConvertError::Load { .. })));
    }

    #[test]
    fn test_undecodable_bytes_is_load_error() {
        let result = load_rgb(ImageSource::Bytes(b"definitely not an image"));
        assert!(matches!(result, Err(ConvertError::Load { .. })));
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 3, Rgba([10, 20, 30, 40])));
        let rgb = load_rgb(ImageSource::from(&img)).unwrap();
        assert_eq!(rgb.dimensions(), (2, 3));
        assert_eq!(*rgb.get_pixel(1, 2), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_grayscale_expands_to_three_channels() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(1, 1, Luma([77])));
        let rgb = load_rgb(ImageSource::from(&img)).unwrap();
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([77, 77, 77]));
    }

    #[test]
    fn test_zero_dimension_is_invalid() {
        let img = RgbImage::new(0, 5);
        let result = load_rgb(ImageSource::from(&img));
        assert!(matches!(
            result,
            Err(ConvertError::InvalidImage { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_decodes_png_bytes() {
        let src = RgbImage::from_pixel(4, 2, Rgb([1, 2, 3]));
        let mut buf = Cursor::new(Vec::new());
        src.write_to(&mut buf, ImageFormat::Png).unwrap();

        let rgb = load_rgb(ImageSource::Bytes(buf.get_ref())).unwrap();
        assert_eq!(rgb, src);
    }
}
