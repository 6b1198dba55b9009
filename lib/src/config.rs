use crate::color::ColorMode;
use std::path::PathBuf;

/// Default output width in characters
pub const DEFAULT_OUTPUT_WIDTH: u32 = 200;

/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 20.0;

/// Requested monospace font for the rendered bitmap
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// TrueType/OpenType file to load first
    pub path: Option<PathBuf>,
    /// Pixel height the font is rasterized at
    pub size: f32,
    /// Try well-known system monospace fonts before the built-in bitmap font
    pub system_fallback: bool,
}

impl FontSpec {
    /// Always render with the built-in bitmap font
    pub fn bitmap(size: f32) -> Self {
        Self {
            path: None,
            size,
            system_fallback: false,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            path: None,
            size: DEFAULT_FONT_SIZE,
            system_fallback: true,
        }
    }
}

/// Configuration for ASCII art conversion
///
/// Passed by reference into every conversion and never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Characters per output line, default 200
    pub output_width: u32,

    /// Tone adjustment
    pub contrast: f32,   // typically 0.5-2.0, default 1.0
    pub brightness: f32, // typically 0.5-2.0, default 1.0

    /// Glyph coloring
    pub color_mode: ColorMode,

    /// Rendering
    pub font: FontSpec,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_width: DEFAULT_OUTPUT_WIDTH,

            contrast: 1.0,
            brightness: 1.0,

            color_mode: ColorMode::TrueColor,

            font: FontSpec::default(),
        }
    }
}

impl ConversionConfig {
    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.output_width == 0 {
            return Err("output_width must be positive, got 0".to_string());
        }
        if !self.contrast.is_finite() || self.contrast <= 0.0 {
            return Err(format!("contrast must be a positive number, got {}", self.contrast));
        }
        if !self.brightness.is_finite() || self.brightness <= 0.0 {
            return Err(format!(
                "brightness must be a positive number, got {}",
                self.brightness
            ));
        }
        if !self.font.size.is_finite() || self.font.size <= 0.0 {
            return Err(format!("font size must be a positive number, got {}", self.font.size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConversionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_width, 200);
        assert_eq!(config.color_mode, ColorMode::TrueColor);
    }

    #[test]
    fn test_invalid_output_width() {
        let config = ConversionConfig {
            output_width: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_tone_factors() {
        let mut config = ConversionConfig::default();
        config.contrast = 0.0;
        assert!(config.validate().is_err());

        config.contrast = 1.0;
        config.brightness = -0.5;
        assert!(config.validate().is_err());

        config.brightness = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_factors_outside_typical_range_are_accepted() {
        let config = ConversionConfig {
            contrast: 3.5,
            brightness: 0.1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_font_spec_defaults() {
        let spec = FontSpec::default();
        assert!(spec.path.is_none());
        assert!(spec.system_fallback);
        assert!(!FontSpec::bitmap(8.0).system_fallback);
    }

    #[test]
    fn test_invalid_font_size() {
        let mut config = ConversionConfig::default();
        config.font.size = 0.0;
        assert!(config.validate().is_err());
    }
}
