use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category colours: chart category label → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of one chart to distinct colours. The "Unknown"
/// category is always grey.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
    unknown_label: &'static str,
}

impl CategoryColors {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>, unknown_label: &'static str) -> Self {
        let labels: Vec<&str> = labels.into_iter().filter(|l| *l != unknown_label).collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, color)| (label.to_string(), color))
            .collect();

        CategoryColors { mapping, unknown_label }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        if label == self.unknown_label {
            return Color32::GRAY;
        }
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}
