//! Perceptually-uniform colour scales for heatmap rendering.
//!
//! Each scale is a list of evenly spaced stops sampled from the reference
//! matplotlib map; values between stops are linearly interpolated per channel.

use image::Rgba;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const PLASMA: [[u8; 3]; 11] = [
    [0x0d, 0x08, 0x87],
    [0x3e, 0x04, 0x9c],
    [0x6a, 0x00, 0xa8],
    [0x8f, 0x0d, 0xa4],
    [0xb1, 0x2a, 0x90],
    [0xcc, 0x46, 0x78],
    [0xe1, 0x64, 0x62],
    [0xf1, 0x83, 0x4b],
    [0xfc, 0xa6, 0x36],
    [0xfc, 0xce, 0x25],
    [0xf0, 0xf9, 0x21],
];

const VIRIDIS: [[u8; 3]; 11] = [
    [0x44, 0x01, 0x54],
    [0x48, 0x25, 0x76],
    [0x41, 0x44, 0x87],
    [0x35, 0x60, 0x8d],
    [0x2a, 0x78, 0x8e],
    [0x21, 0x90, 0x8c],
    [0x22, 0xa8, 0x84],
    [0x43, 0xbf, 0x71],
    [0x7a, 0xd1, 0x51],
    [0xbb, 0xdf, 0x27],
    [0xfd, 0xe7, 0x25],
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Plasma,
    Viridis,
}

impl Colormap {
    /// Names accepted on the command line.
    pub const NAMES: [&'static str; 2] = ["plasma", "viridis"];

    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            Colormap::Plasma => &PLASMA,
            Colormap::Viridis => &VIRIDIS,
        }
    }

    /// Colour for a normalised value. Inputs are clamped to `[0, 1]`; NaN maps to 0.
    pub fn color_at(self, t: f64) -> Rgba<u8> {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let pos = t * (stops.len() - 1) as f64;
        let lower = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - lower as f64;

        let [r, g, b] = interpolate(stops[lower], stops[lower + 1], frac);
        Rgba([r, g, b, 255])
    }

    /// Colour for `value` scaled linearly between `min` and `max`.
    /// A degenerate range maps every value to the low end.
    pub fn map(self, value: f64, min: f64, max: f64) -> Rgba<u8> {
        let range = max - min;
        if range.abs() < f64::EPSILON {
            return self.color_at(0.0);
        }
        self.color_at((value - min) / range)
    }
}

fn interpolate(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colormap::Plasma => write!(f, "plasma"),
            Colormap::Viridis => write!(f, "viridis"),
        }
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plasma" => Ok(Colormap::Plasma),
            "viridis" => Ok(Colormap::Viridis),
            other => Err(format!("unknown colormap '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_match_stops() {
        assert_eq!(Colormap::Plasma.color_at(0.0), Rgba([0x0d, 0x08, 0x87, 255]));
        assert_eq!(Colormap::Plasma.color_at(1.0), Rgba([0xf0, 0xf9, 0x21, 255]));
        assert_eq!(Colormap::Viridis.color_at(0.0), Rgba([0x44, 0x01, 0x54, 255]));
        assert_eq!(Colormap::Viridis.color_at(1.0), Rgba([0xfd, 0xe7, 0x25, 255]));
    }

    #[test]
    fn test_midpoint_hits_middle_stop() {
        assert_eq!(Colormap::Plasma.color_at(0.5), Rgba([0xcc, 0x46, 0x78, 255]));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(Colormap::Plasma.color_at(-3.0), Colormap::Plasma.color_at(0.0));
        assert_eq!(Colormap::Plasma.color_at(7.0), Colormap::Plasma.color_at(1.0));
        assert_eq!(Colormap::Plasma.color_at(f64::NAN), Colormap::Plasma.color_at(0.0));
    }

    #[test]
    fn test_interpolates_between_stops() {
        // Halfway between the first two plasma stops.
        let c = Colormap::Plasma.color_at(0.05);
        assert_eq!(c, Rgba([0x26, 0x06, 0x92, 255]));
    }

    #[test]
    fn test_map_scales_to_range() {
        let cmap = Colormap::Viridis;
        assert_eq!(cmap.map(-50.0, -50.0, 150.0), cmap.color_at(0.0));
        assert_eq!(cmap.map(150.0, -50.0, 150.0), cmap.color_at(1.0));
        assert_eq!(cmap.map(50.0, -50.0, 150.0), cmap.color_at(0.5));
    }

    #[test]
    fn test_degenerate_range_maps_low() {
        assert_eq!(Colormap::Plasma.map(4.0, 4.0, 4.0), Colormap::Plasma.color_at(0.0));
    }

    #[test]
    fn test_parse_names() {
        for name in Colormap::NAMES {
            let cmap: Colormap = name.parse().unwrap();
            assert_eq!(cmap.to_string(), name);
        }
        assert!("jet".parse::<Colormap>().is_err());
    }
}
