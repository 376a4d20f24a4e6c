use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::{Dataset, Dimension, Field, FieldValue};
use crate::data::registry::distinct_values;

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
            to_color32(hsl.into_color())
        })
        .collect()
}

/// Red → yellow → green scale for `t` in `[0, 1]` (low values red).
pub fn red_yellow_green(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.5 };
    let red: LinSrgb = Srgb::<f32>::new(0.84, 0.19, 0.15).into_linear();
    let yellow: LinSrgb = Srgb::<f32>::new(1.0, 1.0, 0.75).into_linear();
    let green: LinSrgb = Srgb::<f32>::new(0.10, 0.60, 0.31).into_linear();
    let mixed = if t < 0.5 {
        red.mix(yellow, t * 2.0)
    } else {
        yellow.mix(green, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of one column to distinct colours. Built from the full
/// option set, so a category keeps its colour whatever the filters hide.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<FieldValue, Color32>,
}

impl ColorMap {
    pub fn new(values: &BTreeSet<FieldValue>) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &FieldValue) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}

/// Category colours shared by the charts.
#[derive(Debug, Clone, Default)]
pub struct ChartColors {
    pub seniority: ColorMap,
    pub contract: ColorMap,
    pub remote: ColorMap,
}

impl ChartColors {
    pub fn new(dataset: &Dataset) -> Self {
        let options = dataset.options();
        ChartColors {
            seniority: ColorMap::new(options.get(Dimension::Seniority)),
            contract: ColorMap::new(options.get(Dimension::ContractType)),
            remote: ColorMap::new(&distinct_values(dataset.records(), Field::RemoteType)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn scale_ends_are_red_and_green() {
        let low = red_yellow_green(0.0);
        let high = red_yellow_green(1.0);
        assert!(low.r() > low.g());
        assert!(high.g() > high.r());
        assert_eq!(red_yellow_green(-3.0), low);
        assert_eq!(red_yellow_green(f64::NAN), red_yellow_green(0.5));
    }

    #[test]
    fn unknown_value_is_gray() {
        let values: BTreeSet<FieldValue> = ["Junior", "Senior"].into_iter().map(FieldValue::from).collect();
        let map = ColorMap::new(&values);
        assert_ne!(map.color_for(&"Junior".into()), map.color_for(&"Senior".into()));
        assert_eq!(map.color_for(&"Intern".into()), Color32::GRAY);
    }
}
