//! Color modes applied to the sampled source color of each glyph.

use image::Rgb;
use std::fmt;
use std::str::FromStr;

/// A single RGB channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// A pair of RGB channels, named after the subtractive color they produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelPair {
    /// Green + Blue
    Cyan,
    /// Red + Blue
    Magenta,
    /// Red + Green
    Yellow,
}

/// How the sampled source color is turned into a glyph color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMode {
    #[default]
    TrueColor,
    Monochrome,
    Grayscale,
    SingleChannel(Channel),
    DualChannel(ChannelPair),
}

impl ColorMode {
    /// Every mode, in the order `next` cycles through them
    pub const ALL: [ColorMode; 9] = [
        ColorMode::TrueColor,
        ColorMode::Monochrome,
        ColorMode::SingleChannel(Channel::Green),
        ColorMode::SingleChannel(Channel::Blue),
        ColorMode::SingleChannel(Channel::Red),
        ColorMode::DualChannel(ChannelPair::Cyan),
        ColorMode::DualChannel(ChannelPair::Magenta),
        ColorMode::DualChannel(ChannelPair::Yellow),
        ColorMode::Grayscale,
    ];

    /// Apply this mode to a source pixel
    ///
    /// All modes except `TrueColor` work from the truncated channel average
    /// `(r + g + b) / 3`.
    pub fn apply(self, pixel: Rgb<u8>) -> Rgb<u8> {
        let avg = channel_average(pixel);
        match self {
            ColorMode::TrueColor => pixel,
            ColorMode::Monochrome => {
                if avg < 128 {
                    Rgb([0, 0, 0])
                } else {
                    Rgb([255, 255, 255])
                }
            }
            ColorMode::Grayscale => Rgb([avg, avg, avg]),
            ColorMode::SingleChannel(Channel::Red) => Rgb([avg, 0, 0]),
            ColorMode::SingleChannel(Channel::Green) => Rgb([0, avg, 0]),
            ColorMode::SingleChannel(Channel::Blue) => Rgb([0, 0, avg]),
            ColorMode::DualChannel(ChannelPair::Cyan) => Rgb([0, avg, avg]),
            ColorMode::DualChannel(ChannelPair::Magenta) => Rgb([avg, 0, avg]),
            ColorMode::DualChannel(ChannelPair::Yellow) => Rgb([avg, avg, 0]),
        }
    }

    /// The mode following this one in [`ColorMode::ALL`], wrapping around
    pub fn next(self) -> ColorMode {
        let idx = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Short, stable name used for display and parsing
    pub fn name(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "true_color",
            ColorMode::Monochrome => "mono",
            ColorMode::Grayscale => "grayscale",
            ColorMode::SingleChannel(Channel::Red) => "red",
            ColorMode::SingleChannel(Channel::Green) => "green",
            ColorMode::SingleChannel(Channel::Blue) => "blue",
            ColorMode::DualChannel(ChannelPair::Cyan) => "cyan",
            ColorMode::DualChannel(ChannelPair::Magenta) => "magenta",
            ColorMode::DualChannel(ChannelPair::Yellow) => "yellow",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown color mode name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color mode: {0}")]
pub struct UnknownColorMode(pub String);

impl FromStr for ColorMode {
    type Err = UnknownColorMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        ColorMode::ALL
            .into_iter()
            .find(|mode| mode.name() == name)
            .ok_or(UnknownColorMode(s.to_string()))
    }
}

/// Truncated integer average of the three channels
pub fn channel_average(pixel: Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_true_color_is_identity() {
        let px = Rgb([12, 200, 99]);
        assert_eq!(ColorMode::TrueColor.apply(px), px);
    }

    #[test]
    fn test_monochrome_threshold() {
        assert_eq!(ColorMode::Monochrome.apply(Rgb([200, 200, 200])), Rgb([255, 255, 255]));
        assert_eq!(ColorMode::Monochrome.apply(Rgb([50, 50, 50])), Rgb([0, 0, 0]));
        // avg = 127
        assert_eq!(ColorMode::Monochrome.apply(Rgb([127, 127, 128])), Rgb([0, 0, 0]));
        // avg = 128
        assert_eq!(ColorMode::Monochrome.apply(Rgb([128, 128, 128])), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_average_truncates() {
        assert_eq!(channel_average(Rgb([1, 1, 2])), 1);
        assert_eq!(channel_average(Rgb([255, 255, 255])), 255);
        assert_eq!(ColorMode::Grayscale.apply(Rgb([10, 20, 31])), Rgb([20, 20, 20]));
    }

    #[test]
    fn test_single_channel() {
        let px = Rgb([30, 60, 90]);
        assert_eq!(ColorMode::SingleChannel(Channel::Red).apply(px), Rgb([60, 0, 0]));
        assert_eq!(ColorMode::SingleChannel(Channel::Green).apply(px), Rgb([0, 60, 0]));
        assert_eq!(ColorMode::SingleChannel(Channel::Blue).apply(px), Rgb([0, 0, 60]));
    }

    #[test]
    fn test_dual_channel() {
        let px = Rgb([30, 60, 90]);
        assert_eq!(ColorMode::DualChannel(ChannelPair::Cyan).apply(px), Rgb([0, 60, 60]));
        assert_eq!(ColorMode::DualChannel(ChannelPair::Magenta).apply(px), Rgb([60, 0, 60]));
        assert_eq!(ColorMode::DualChannel(ChannelPair::Yellow).apply(px), Rgb([60, 60, 0]));
    }

    #[test]
    fn test_monochrome_and_grayscale_idempotent() {
        for mode in [ColorMode::Monochrome, ColorMode::Grayscale] {
            for v in (0..=255u16).step_by(7) {
                let px = Rgb([v as u8, (255 - v) as u8, (v / 2) as u8]);
                let once = mode.apply(px);
                assert_eq!(mode.apply(once), once, "{mode} not idempotent for {px:?}");
            }
        }
    }

    #[test]
    fn test_next_cycles_through_all_modes() {
        let mut mode = ColorMode::TrueColor;
        for expected in ColorMode::ALL.iter().skip(1) {
            mode = mode.next();
            assert_eq!(mode, *expected);
        }
        assert_eq!(mode.next(), ColorMode::TrueColor);
    }

    #[test]
    fn test_name_round_trip_and_unknown() {
        for mode in ColorMode::ALL {
            assert_eq!(mode.name().parse::<ColorMode>(), Ok(mode));
        }
        assert_eq!(" Mono ".parse::<ColorMode>(), Ok(ColorMode::Monochrome));
        assert!("sepia".parse::<ColorMode>().is_err());
    }
}
