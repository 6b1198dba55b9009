use thiserror::Error;

/// Errors produced by a single conversion or by saving its result
///
/// Every variant is terminal for the call that returned it; nothing is retried
/// and no partial result is kept.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input was missing or could not be decoded as an image
    #[error("failed to load image from {origin}: {source}")]
    Load {
        origin: String,
        #[source]
        source: image::ImageError,
    },

    /// The decoded image has a zero dimension
    #[error("invalid image: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// The character grid came out with no rows or no columns
    #[error("conversion produced an empty {columns}x{rows} character grid")]
    EmptyResult { columns: u32, rows: u32 },

    /// The supplied configuration was rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Encoding or writing the rendered bitmap failed
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing the ASCII text failed
    #[error("failed to write ascii text: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
