use serde::{Deserialize, Serialize};
use std::fmt;

/// An HSL color as the page renders it: hue in degrees, saturation and
/// lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub fn new(hue: i32, saturation: i32, lightness: i32) -> Self {
        Hsl {
            hue: hue.rem_euclid(360) as u16,
            saturation: saturation.clamp(0, 100) as u8,
            lightness: lightness.clamp(0, 100) as u8,
        }
    }

    /// Offsets every channel, wrapping hue and clamping the percentages.
    pub fn shifted(&self, hue: i32, saturation: i32, lightness: i32) -> Self {
        Hsl::new(
            i32::from(self.hue) + hue,
            i32::from(self.saturation) + saturation,
            i32::from(self.lightness) + lightness,
        )
    }

    pub fn with_lightness(&self, lightness: u8) -> Self {
        Hsl {
            lightness: lightness.min(100),
            ..*self
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let color = Hsl::new(113, 70, 69);
        assert_eq!(color.to_string(), "hsl(113, 70%, 69%)");
    }

    #[test]
    fn test_shift_clamps_and_wraps() {
        let color = Hsl::new(350, 20, 3);
        assert_eq!(color.shifted(20, -40, -5), Hsl::new(10, 0, 0));
        assert_eq!(Hsl::new(-10, 150, 50).hue, 350);
        assert_eq!(Hsl::new(-10, 150, 50).saturation, 100);
    }
}
