use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Cool-warm ramp: `t = 0` is blue, `0.5` is near white, `1` is red.
pub fn coolwarm(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let cool = LinSrgb::new(0.23, 0.30, 0.75);
    let mid = LinSrgb::new(0.87, 0.87, 0.87);
    let warm = LinSrgb::new(0.71, 0.02, 0.15);
    let mixed = if t < 0.5 {
        cool.mix(mid, t * 2.0)
    } else {
        mid.mix(warm, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: disaster type → Color32
// ---------------------------------------------------------------------------

/// Maps every disaster type in the dataset to a distinct colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap {
            mapping: BTreeMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

impl ColorMap {
    /// Build a colour map from the dataset's distinct disaster types.
    pub fn new(disaster_types: &BTreeSet<String>) -> Self {
        let palette = generate_palette(disaster_types.len());
        let mapping = disaster_types.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given disaster type.
    pub fn color_for(&self, disaster_type: &str) -> Color32 {
        self.mapping
            .get(disaster_type)
            .copied()
            .unwrap_or(self.default_color)
    }
}
