//! Threshold palettes: map a normalized value to a color through an
//! ascending list of color stops.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Returned when a value lies above every threshold
pub const FALLBACK_COLOR: Color = Color::new(255, 255, 255);

/// 8-bit RGB color, serialized as `#rrggbb`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self { r: level, g: level, b: level }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(s: &str) -> Result<Self, RenderError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RenderError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| RenderError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Linear blend toward `other`, truncating each channel
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).clamp(0.0, 255.0) as u8;
        Color::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = RenderError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub threshold: f64,
    pub color: Color,
}

impl ColorStop {
    pub const fn new(threshold: f64, color: Color) -> Self {
        Self { threshold, color }
    }
}

/// Non-empty color stops with non-decreasing thresholds in [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct ColorStopList {
    stops: Vec<ColorStop>,
}

impl ColorStopList {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, RenderError> {
        if stops.is_empty() {
            return Err(RenderError::EmptyPalette);
        }
        let mut previous = 0.0;
        for (index, stop) in stops.iter().enumerate() {
            let threshold = stop.threshold;
            if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                return Err(RenderError::InvalidThreshold { index, threshold });
            }
            if threshold < previous {
                return Err(RenderError::UnorderedPalette { index, previous, threshold });
            }
            previous = threshold;
        }
        Ok(Self { stops })
    }

    /// Water, beach, grass, forest, rock, snow
    pub fn terrain() -> Self {
        Self {
            stops: vec![
                ColorStop::new(0.30, Color::new(16, 42, 96)),
                ColorStop::new(0.42, Color::new(38, 102, 168)),
                ColorStop::new(0.47, Color::new(222, 206, 150)),
                ColorStop::new(0.60, Color::new(86, 152, 66)),
                ColorStop::new(0.72, Color::new(42, 98, 46)),
                ColorStop::new(0.85, Color::new(120, 108, 96)),
                ColorStop::new(1.00, Color::new(245, 245, 250)),
            ],
        }
    }

    /// Random palette of 3-8 stops ending at 1.0
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let count = rng.gen_range(3..=8);
        let mut thresholds: Vec<f64> = (0..count - 1).map(|_| rng.gen_range(0.05..0.95)).collect();
        thresholds.sort_by(|a, b| a.total_cmp(b));
        thresholds.push(1.0);

        let stops = thresholds
            .into_iter()
            .map(|threshold| ColorStop::new(threshold, Color::new(rng.gen(), rng.gen(), rng.gen())))
            .collect();
        Self { stops }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Color for a normalized value: the first stop whose threshold is at
    /// least `value`, optionally blended with the stop before it.
    pub fn color_for(&self, value: f64, smoothing: bool) -> Color {
        let Some(index) = self.stops.iter().position(|stop| stop.threshold >= value) else {
            return FALLBACK_COLOR;
        };
        let stop = self.stops[index];
        if !smoothing || index == 0 {
            return stop.color;
        }

        let prev = self.stops[index - 1];
        let span = stop.threshold - prev.threshold;
        let ratio = if span > 0.0 {
            ((value - prev.threshold) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        prev.color.lerp(stop.color, ratio)
    }
}

impl Default for ColorStopList {
    fn default() -> Self {
        Self::terrain()
    }
}

impl TryFrom<Vec<ColorStop>> for ColorStopList {
    type Error = RenderError;

    fn try_from(stops: Vec<ColorStop>) -> Result<Self, Self::Error> {
        Self::new(stops)
    }
}

impl From<ColorStopList> for Vec<ColorStop> {
    fn from(list: ColorStopList) -> Self {
        list.stops
    }
}

/// Gray level for a normalized value, bypassing the palette
pub fn grayscale(value: f64) -> Color {
    Color::gray((value * 255.0).clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn black_to_white() -> ColorStopList {
        ColorStopList::new(vec![
            ColorStop::new(0.0, Color::new(0, 0, 0)),
            ColorStop::new(1.0, Color::new(255, 255, 255)),
        ])
        .unwrap()
    }

    #[test]
    fn test_smoothing_midpoint() {
        assert_eq!(black_to_white().color_for(0.5, true), Color::new(127, 127, 127));
    }

    #[test]
    fn test_without_smoothing_takes_matched_stop() {
        assert_eq!(black_to_white().color_for(0.5, false), Color::new(255, 255, 255));
        assert_eq!(black_to_white().color_for(0.0, true), Color::new(0, 0, 0));
    }

    #[test]
    fn test_fallback_above_last_threshold() {
        let palette = ColorStopList::new(vec![ColorStop::new(0.5, Color::new(255, 0, 0))]).unwrap();
        assert_eq!(palette.color_for(0.9, true), FALLBACK_COLOR);
        assert_eq!(palette.color_for(0.9, false), Color::new(255, 255, 255));
        assert_eq!(palette.color_for(0.2, true), Color::new(255, 0, 0));
    }

    #[test]
    fn test_equal_thresholds_do_not_produce_nan() {
        let palette = ColorStopList::new(vec![
            ColorStop::new(0.5, Color::new(10, 20, 30)),
            ColorStop::new(0.5, Color::new(200, 200, 200)),
            ColorStop::new(1.0, Color::new(0, 0, 0)),
        ])
        .unwrap();
        // First matching stop wins, so the duplicate is never reached at 0.5
        assert_eq!(palette.color_for(0.5, true), Color::new(10, 20, 30));

        let degenerate = ColorStopList::new(vec![
            ColorStop::new(0.0, Color::new(10, 20, 30)),
            ColorStop::new(0.0, Color::new(200, 200, 200)),
        ])
        .unwrap();
        assert_eq!(degenerate.color_for(0.0, true), Color::new(10, 20, 30));
    }

    #[test]
    fn test_validation() {
        assert_eq!(ColorStopList::new(vec![]).unwrap_err(), RenderError::EmptyPalette);
        assert!(matches!(
            ColorStopList::new(vec![ColorStop::new(1.5, Color::gray(0))]),
            Err(RenderError::InvalidThreshold { index: 0, .. })
        ));
        assert!(matches!(
            ColorStopList::new(vec![ColorStop::new(f64::NAN, Color::gray(0))]),
            Err(RenderError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            ColorStopList::new(vec![
                ColorStop::new(0.6, Color::gray(0)),
                ColorStop::new(0.4, Color::gray(0)),
            ]),
            Err(RenderError::UnorderedPalette { index: 1, .. })
        ));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::new(255, 128, 0));
        assert_eq!(Color::from_hex("0a0b0c").unwrap(), Color::new(10, 11, 12));
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        // from_str_radix alone would take the sign
        assert!(Color::from_hex("#+f+f+f").is_err());
        assert!(Color::from_hex("+f+f+f").is_err());
        assert_eq!(Color::new(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn test_palette_json_rejects_unordered_stops() {
        let json = r##"[{"threshold":0.8,"color":"#000000"},{"threshold":0.2,"color":"#ffffff"}]"##;
        assert!(serde_json::from_str::<ColorStopList>(json).is_err());

        let json = r##"[{"threshold":0.2,"color":"#000000"},{"threshold":1.0,"color":"#ffffff"}]"##;
        let palette: ColorStopList = serde_json::from_str(json).unwrap();
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_random_palette_is_valid_and_seeded() {
        let a = ColorStopList::random(&mut ChaCha8Rng::seed_from_u64(7));
        let b = ColorStopList::random(&mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(ColorStopList::new(a.stops().to_vec()).is_ok());
        assert_eq!(a.stops().last().unwrap().threshold, 1.0);
    }

    #[test]
    fn test_grayscale() {
        assert_eq!(grayscale(0.0), Color::gray(0));
        assert_eq!(grayscale(1.0), Color::gray(255));
        assert_eq!(grayscale(0.5), Color::gray(127));
    }
}
