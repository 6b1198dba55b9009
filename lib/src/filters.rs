use image::{GrayImage, Luma, RgbImage};

/// Calculate luminance from an RGB image using the ITU-R BT.601 luma weights
///
/// Formula: L = (299*R + 587*G + 114*B) / 1000, in integer arithmetic
///
/// # Arguments
/// * `img` - Input RGB image
///
/// # Returns
/// Grayscale image with luminance values
pub fn calculate_luminance(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
        output.put_pixel(x, y, Luma([luma as u8]));
    }

    output
}

/// Arithmetic mean of every channel value in the image
///
/// One scalar for the whole frame, not per row or per channel.
pub fn global_mean(img: &RgbImage) -> f64 {
    let raw = img.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| v as u64).sum();
    sum as f64 / raw.len() as f64
}

/// Absorbs float error in `(p - mean) + mean` before truncating
const TRUNCATION_EPSILON: f64 = 1e-9;

/// Apply contrast and brightness around the global mean
///
/// Per channel value: `clamp((p - mean) * contrast + mean) * brightness`,
/// clamped again to [0, 255] and truncated to u8. A small epsilon is added
/// before truncation so float noise like `99.999…` still lands on `100`.
///
/// # Arguments
/// * `img` - Input RGB image (left untouched)
/// * `contrast` - Contrast factor, 1.0 leaves the image unchanged
/// * `brightness` - Brightness factor, 1.0 leaves the image unchanged
///
/// # Returns
/// A new image with identical dimensions
pub fn adjust_tone(img: &RgbImage, contrast: f32, brightness: f32) -> RgbImage {
    let mean = global_mean(img);
    let contrast = contrast as f64;
    let brightness = brightness as f64;

    let mut output = img.clone();
    for value in output.iter_mut() {
        let contrasted = ((*value as f64 - mean) * contrast + mean).clamp(0.0, 255.0);
        let scaled = (contrasted * brightness).clamp(0.0, 255.0);
        *value = (scaled + TRUNCATION_EPSILON).min(255.0) as u8;
    }

    output
}
