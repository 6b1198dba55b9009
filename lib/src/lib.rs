//! ASCII Renderer - CPU-based image to colored ASCII art converter
//!
//! Converts a raster image into lines of ASCII text and a matching bitmap in
//! which every character is drawn in a color taken from the pixel it replaces.
//!
//! # Example
//! ```no_run
//! use ascii_rendr::{ColorMode, ConversionConfig, convert};
//!
//! let config = ConversionConfig {
//!     output_width: 120,
//!     color_mode: ColorMode::Grayscale,
//!     ..Default::default()
//! };
//! let art = convert("photo.jpg", &config).unwrap();
//! println!("{}", art.text());
//! art.save_image("ascii_art.png").unwrap();
//! ```

pub mod ascii;
pub mod color;
pub mod config;
pub mod error;
pub mod filters;
pub mod font;
pub mod loader;
pub mod lut;
pub mod processor;

// Re-export main types for convenience
pub use color::{Channel, ChannelPair, ColorMode};
pub use config::{ConversionConfig, FontSpec};
pub use error::ConvertError;
pub use font::{BitmapFont, MonospaceFont, SYSTEM_MONOSPACE_FONTS, TrueTypeFont, load_font};
pub use loader::ImageSource;
pub use processor::{AsciiArt, AsciiConverter, convert};
