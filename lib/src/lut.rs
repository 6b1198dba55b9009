//! Character ramp used for density mapping
//!
//! Characters are ordered from the darkest-appearing (densest ink) to the
//! lightest-appearing. The last entry is a space. The backslash appears twice,
//! at indices 41 and 67.

/// Density ramp, darkest first
pub const CHARACTER_RAMP: &str =
    r#"$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\|()1{}[]?-_+~<>i!lI;:,"^`\'. "#;

/// Ramp as a char slice, for direct indexing
pub const RAMP_CHARS: [char; 71] = ramp_chars();

const fn ramp_chars() -> [char; 71] {
    let bytes = CHARACTER_RAMP.as_bytes();
    assert!(bytes.len() == 71, "ramp must be 71 ASCII characters");
    let mut out = [' '; 71];
    let mut i = 0;
    while i < 71 {
        out[i] = bytes[i] as char;
        i += 1;
    }
    out
}

/// Ramp index for a grayscale intensity
///
/// `floor(p / 255 * (len - 1))`, clamped to the ramp bounds.
pub fn ramp_index(intensity: u8) -> usize {
    let last = RAMP_CHARS.len() - 1;
    // Integer form of the float formula; identical for every u8 input
    let index = intensity as usize * last / 255;
    index.min(last)
}

/// Character for a grayscale intensity
pub fn get_ramp_char(intensity: u8) -> char {
    RAMP_CHARS[ramp_index(intensity)]
}
