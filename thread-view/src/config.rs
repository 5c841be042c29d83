use serde::{Deserialize, Serialize};
use thread_ref::Hsl;

use crate::Error;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    pub palette: Palette,
    /// How far past the window edge the footer may sit and still count as
    /// "scrolled to the bottom", in pixels.
    pub stay_down_margin: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            palette: Palette::default(),
            stay_down_margin: 200.0,
        }
    }
}

impl ViewConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HslMask {
    pub hue: i32,
    pub saturation: i32,
    pub lightness: i32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Palette {
    /// Generator state before the first color is handed out.
    pub start: Hsl,
    pub hue_step: u16,
    pub lightness_step: u8,
    pub lightness_span: u8,
    pub lightness_floor: u8,
    /// Applied to a referenced post's color when a link to it is hovered.
    pub dark_mask: HslMask,
    /// Lightness every author header is flattened to on hover.
    pub pale_lightness: u8,
    /// Body color for quoting a post that has no color yet.
    pub quote: Hsl,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            start: Hsl::new(0, 70, 80),
            hue_step: 113,
            lightness_step: 89,
            lightness_span: 20,
            lightness_floor: 65,
            dark_mask: HslMask {
                hue: 0,
                saturation: -40,
                lightness: -5,
            },
            pale_lightness: 90,
            quote: Hsl::new(46, 17, 76),
        }
    }
}

impl Palette {
    pub fn dark(&self, color: Hsl) -> Hsl {
        let HslMask {
            hue,
            saturation,
            lightness,
        } = self.dark_mask;
        color.shifted(hue, saturation, lightness)
    }

    pub fn pale(&self, seed: Hsl) -> Hsl {
        seed.with_lightness(self.pale_lightness)
    }
}
