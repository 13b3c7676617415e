use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Diverging colour map for the correlation heatmap
// ---------------------------------------------------------------------------

/// Maps values in [-1, 1] onto a blue → light grey → red ramp.
///
/// Interpolation happens in linear RGB so the midpoint does not go muddy.
#[derive(Debug, Clone)]
pub struct DivergingColorMap {
    low: LinSrgb,
    mid: LinSrgb,
    high: LinSrgb,
    nan_color: Color32,
}

impl Default for DivergingColorMap {
    fn default() -> Self {
        Self {
            low: Srgb::new(0.230, 0.299, 0.754).into_linear(),
            mid: Srgb::new(0.865, 0.865, 0.865).into_linear(),
            high: Srgb::new(0.706, 0.016, 0.150).into_linear(),
            nan_color: Color32::from_gray(110),
        }
    }
}

impl DivergingColorMap {
    /// Colour for a coefficient.  NaN gets the neutral "undefined" colour.
    pub fn color_for(&self, value: f64) -> Color32 {
        if value.is_nan() {
            return self.nan_color;
        }
        let t = value.clamp(-1.0, 1.0) as f32;
        let lin = if t < 0.0 {
            self.mid.mix(self.low, -t)
        } else {
            self.mid.mix(self.high, t)
        };
        to_color32(Srgb::from_linear(lin))
    }

    /// Black or white, whichever reads better on top of `background`.
    pub fn text_color_for(background: Color32) -> Color32 {
        let luma = 0.299 * background.r() as f32
            + 0.587 * background.g() as f32
            + 0.114 * background.b() as f32;
        if luma > 140.0 {
            Color32::BLACK
        } else {
            Color32::WHITE
        }
    }
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let cm = DivergingColorMap::default();
        let low = cm.color_for(-1.0);
        let high = cm.color_for(1.0);
        assert!(low.b() > low.r());
        assert!(high.r() > high.b());
    }

    #[test]
    fn test_midpoint_is_neutral() {
        let mid = DivergingColorMap::default().color_for(0.0);
        assert_eq!(mid.r(), mid.g());
        assert_eq!(mid.g(), mid.b());
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let cm = DivergingColorMap::default();
        assert_eq!(cm.color_for(3.0), cm.color_for(1.0));
    }

    #[test]
    fn test_nan_gets_neutral_color() {
        let cm = DivergingColorMap::default();
        assert_eq!(cm.color_for(f64::NAN), Color32::from_gray(110));
    }

    #[test]
    fn test_text_contrast() {
        assert_eq!(DivergingColorMap::text_color_for(Color32::WHITE), Color32::BLACK);
        assert_eq!(DivergingColorMap::text_color_for(Color32::from_rgb(20, 20, 120)), Color32::WHITE);
    }
}
