use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::format::TrendSentiment;

pub const SUCCESS: Color32 = Color32::from_rgb(34, 160, 90);
pub const WARNING: Color32 = Color32::from_rgb(226, 150, 30);
pub const DESTRUCTIVE: Color32 = Color32::from_rgb(210, 60, 60);
pub const PRIMARY: Color32 = Color32::from_rgb(40, 110, 220);
pub const PRIMARY_LIGHT: Color32 = Color32::from_rgb(130, 175, 240);
pub const MUTED: Color32 = Color32::GRAY;

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
            let hsl = Hsl::new(hue, 0.65, 0.5);
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
// Category mapping: label → Color32
// ---------------------------------------------------------------------------

/// Stable colour per category label (therapeutic class, formulary tier),
/// so the same class keeps its colour across charts.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CategoryColors {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.as_ref().to_string(), c))
            .collect();
        CategoryColors { mapping }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(MUTED)
    }
}

// ---------------------------------------------------------------------------
// Semantic colours
// ---------------------------------------------------------------------------

/// Badge text and colour for a TE code.
pub fn te_badge(code: Option<&str>) -> (String, Color32) {
    match code {
        None | Some("") | Some("NA") => ("No TE".to_string(), MUTED),
        Some(code) if code.starts_with("AB") => (code.to_string(), SUCCESS),
        Some(code) => (code.to_string(), WARNING),
    }
}

pub fn trend_color(sentiment: TrendSentiment) -> Color32 {
    match sentiment {
        TrendSentiment::Good => SUCCESS,
        TrendSentiment::Bad => DESTRUCTIVE,
        TrendSentiment::Neutral => MUTED,
    }
}

/// Safety score from the combination analysis.
pub fn safety_color(score: &str) -> Color32 {
    match score {
        "High" => SUCCESS,
        "Medium" => WARNING,
        _ => DESTRUCTIVE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn categories_keep_their_colour() {
        let colors = CategoryColors::new(&["Insulin", "Statins"]);
        assert_eq!(colors.color_for("Statins"), colors.color_for("Statins"));
        assert_ne!(colors.color_for("Statins"), colors.color_for("Insulin"));
        assert_eq!(colors.color_for("Unknown"), MUTED);
    }

    #[test]
    fn te_badges() {
        assert_eq!(te_badge(None).0, "No TE");
        assert_eq!(te_badge(Some("NA")).1, MUTED);
        assert_eq!(te_badge(Some("AB1")), ("AB1".to_string(), SUCCESS));
        assert_eq!(te_badge(Some("BX")).1, WARNING);
    }
}
