use thread_ref::Hsl;

use crate::config::Palette;

/// Hands out post colors. Hue advances by a fixed step so consecutive colors
/// stay far apart; lightness hops around inside a narrow band. The sequence
/// is never reset while a view is alive.
#[derive(Clone, Debug)]
pub struct ColorGenerator {
    current: Hsl,
    hue_step: u32,
    lightness_step: u32,
    lightness_span: u32,
    lightness_floor: u32,
}

impl ColorGenerator {
    pub fn new(palette: &Palette) -> Self {
        ColorGenerator {
            current: palette.start,
            hue_step: u32::from(palette.hue_step),
            lightness_step: u32::from(palette.lightness_step),
            lightness_span: u32::from(palette.lightness_span).max(1),
            lightness_floor: u32::from(palette.lightness_floor),
        }
    }
}

impl Iterator for ColorGenerator {
    type Item = Hsl;

    fn next(&mut self) -> Option<Hsl> {
        let hue = (u32::from(self.current.hue) + self.hue_step) % 360;
        let lightness = (u32::from(self.current.lightness) + self.lightness_step)
            % self.lightness_span
            + self.lightness_floor;
        self.current = Hsl::new(
            hue as i32,
            i32::from(self.current.saturation),
            lightness as i32,
        );
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence() {
        let mut colors = ColorGenerator::new(&Palette::default());
        let first: Vec<String> = colors.by_ref().take(4).map(|c| c.to_string()).collect();
        assert_eq!(
            first,
            vec![
                "hsl(113, 70%, 74%)",
                "hsl(226, 70%, 68%)",
                "hsl(339, 70%, 82%)",
                "hsl(92, 70%, 76%)",
            ]
        );
    }

    #[test]
    fn test_no_repeat_before_wraparound() {
        let colors: Vec<Hsl> = ColorGenerator::new(&Palette::default()).take(360).collect();
        let mut hues: Vec<u16> = colors.iter().map(|c| c.hue).collect();
        hues.sort_unstable();
        hues.dedup();
        assert_eq!(hues.len(), 360);
    }
}
