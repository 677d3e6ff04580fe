//! Colour-scale legend drawn beside the heatmap: a vertical colour bar,
//! tick marks at "nice" values, and text labels.

use crate::colormap::Colormap;
use ab_glyph::{Font, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;

/// Upper bound on the number of labelled ticks.
pub const MAX_TICKS: usize = 8;
/// Length of a tick mark in pixels.
pub const TICK_LENGTH: u32 = 5;
/// Space between a tick mark and its label.
pub const LABEL_PADDING: u32 = 4;

const STEP_MULTIPLIERS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];
const OUTLINE_COLOR: Rgba<u8> = Rgba([40, 40, 40, 255]);
const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

#[derive(Clone, Debug)]
pub struct Legend {
    min: f64,
    max: f64,
    ticks: Vec<Tick>,
}

impl Legend {
    /// Builds ticks for the value range `[min, max]` of a grid.
    pub fn for_range(min: f64, max: f64) -> Self {
        let (values, step) = nice_ticks(min, max, MAX_TICKS);
        let decimals = step.map_or(0, label_decimals);
        let ticks = values
            .into_iter()
            .map(|value| Tick {
                value,
                label: format!("{:.*}", decimals, value),
            })
            .collect();
        Self { min, max, ticks }
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Widest label in pixels at `scale`.
    pub fn label_width(&self, font: &impl Font, scale: PxScale) -> u32 {
        self.ticks
            .iter()
            .map(|t| text_size(scale, font, &t.label).0)
            .max()
            .unwrap_or(0)
    }

    /// Pixel row of `value` on a bar starting at `top` with `height` rows.
    /// Maximum is at the top. A degenerate range puts everything mid-bar.
    pub fn value_to_y(&self, value: f64, top: u32, height: u32) -> u32 {
        let span = height.saturating_sub(1) as f64;
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return top + (span / 2.0).round() as u32;
        }
        let t = ((self.max - value) / range).clamp(0.0, 1.0);
        top + (t * span).round() as u32
    }

    /// Draws the bar at `(x, y)` of size `width` x `height`, then ticks and
    /// labels to its right.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        img: &mut RgbaImage,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        colormap: Colormap,
        font: &impl Font,
        scale: PxScale,
    ) {
        if width == 0 || height == 0 {
            return;
        }

        let span = height.saturating_sub(1).max(1) as f64;
        for row in 0..height {
            let t = 1.0 - row as f64 / span;
            let rect = Rect::at(x as i32, (y + row) as i32).of_size(width, 1);
            draw_filled_rect_mut(img, rect, colormap.color_at(t));
        }

        let outline = Rect::at(x as i32 - 1, y as i32 - 1).of_size(width + 2, height + 2);
        draw_hollow_rect_mut(img, outline, OUTLINE_COLOR);

        let tick_x = (x + width) as f32;
        for tick in &self.ticks {
            let ty = self.value_to_y(tick.value, y, height);
            draw_line_segment_mut(
                img,
                (tick_x, ty as f32),
                (tick_x + TICK_LENGTH as f32, ty as f32),
                OUTLINE_COLOR,
            );

            let (_, text_h) = text_size(scale, font, &tick.label);
            let label_x = x + width + TICK_LENGTH + LABEL_PADDING;
            let label_y = ty as i32 - (text_h / 2) as i32;
            draw_text_mut(
                img,
                TEXT_COLOR,
                label_x as i32,
                label_y,
                scale,
                font,
                &tick.label,
            );
        }
    }
}

/// Tick values inside `[min, max]` on a step of 1, 2, 2.5 or 5 times a power
/// of ten, with at most `max_ticks` values. Also returns the step, or `None`
/// when the range is degenerate and a single tick is placed at `min`.
pub fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> (Vec<f64>, Option<f64>) {
    if !min.is_finite() || !max.is_finite() || max < min {
        return (Vec::new(), None);
    }
    if (max - min).abs() < f64::EPSILON || max_ticks < 2 {
        return (vec![min], None);
    }

    let raw_step = (max - min) / (max_ticks - 1) as f64;
    let magnitude = 10f64.powi(raw_step.log10().floor() as i32);
    let step = STEP_MULTIPLIERS
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude);

    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    let values = (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            if v == 0.0 { 0.0 } else { v }
        })
        .collect();
    (values, Some(step))
}

/// Fewest decimals that print `step` exactly.
fn label_decimals(step: f64) -> usize {
    (0..=6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.abs().max(1.0)
        })
        .unwrap_or(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_range_ticks() {
        let (ticks, step) = nice_ticks(0.0, 63.0, MAX_TICKS);
        assert_eq!(step, Some(10.0));
        assert_eq!(ticks, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    }

    #[test]
    fn test_negative_range_ticks() {
        let (ticks, step) = nice_ticks(-120.0, 85.5, MAX_TICKS);
        assert_eq!(step, Some(50.0));
        assert_eq!(ticks, vec![-100.0, -50.0, 0.0, 50.0]);
    }

    #[test]
    fn test_fractional_step() {
        let (ticks, step) = nice_ticks(0.0, 1.0, MAX_TICKS);
        assert_eq!(step, Some(0.2));
        assert_eq!(ticks.len(), 6);
        assert!(ticks.len() <= MAX_TICKS);
    }

    #[test]
    fn test_degenerate_range_has_single_tick() {
        let (ticks, step) = nice_ticks(7.0, 7.0, MAX_TICKS);
        assert_eq!(ticks, vec![7.0]);
        assert_eq!(step, None);
    }

    #[test]
    fn test_ticks_never_exceed_limit() {
        for (min, max) in [(0.0, 1.0), (-3.3, 17.9), (100.0, 10_000.0), (-0.02, 0.07)] {
            let (ticks, _) = nice_ticks(min, max, MAX_TICKS);
            assert!(!ticks.is_empty());
            assert!(ticks.len() <= MAX_TICKS, "{} ticks for {}..{}", ticks.len(), min, max);
            assert!(ticks.iter().all(|t| *t >= min - 1e-9 && *t <= max + 1e-9));
        }
    }

    #[test]
    fn test_labels() {
        let legend = Legend::for_range(-120.0, 85.5);
        let labels: Vec<&str> = legend.ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["-100", "-50", "0", "50"]);

        let legend = Legend::for_range(0.0, 1.0);
        assert_eq!(legend.ticks()[1].label, "0.2");
        assert_eq!(label_decimals(2.5), 1);
        assert_eq!(label_decimals(0.25), 2);
    }

    #[test]
    fn test_value_to_y() {
        let legend = Legend::for_range(0.0, 100.0);
        assert_eq!(legend.value_to_y(100.0, 10, 101), 10);
        assert_eq!(legend.value_to_y(0.0, 10, 101), 110);
        assert_eq!(legend.value_to_y(50.0, 10, 101), 60);
    }
}
