//! Heatmap drawing surface.
//!
//! One `HeatmapCanvas` is reused for every record: `draw` paints a grid and
//! its legend, `save` writes the PNG, `clear` wipes the surface before the
//! next record. The buffer is only reallocated when the image size changes.

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::grid::Grid;
use crate::legend::{LABEL_PADDING, Legend, TICK_LENGTH};
use ab_glyph::{FontRef, PxScale};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;

/// Embedded font for legend labels - DejaVu Sans Mono.
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Gap between the grid and the colour bar.
const LEGEND_GAP: u32 = 12;

/// Largest width or height of a rendered image.
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;

/// Pixel geometry of the last drawn image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub grid_x: u32,
    pub grid_y: u32,
    pub cell_size: u32,
    pub rows: u32,
    pub cols: u32,
    pub bar_x: u32,
    pub bar_width: u32,
}

impl Layout {
    /// Top-left pixel of the cell drawn at screen position (`row`, `col`).
    pub fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        (
            self.grid_x + col * self.cell_size,
            self.grid_y + row * self.cell_size,
        )
    }

    pub fn grid_height(&self) -> u32 {
        self.rows * self.cell_size
    }
}

pub struct HeatmapCanvas {
    config: RenderConfig,
    font: FontRef<'static>,
    image: RgbaImage,
    layout: Layout,
}

impl HeatmapCanvas {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let font = FontRef::try_from_slice(FONT_DATA)?;
        Ok(Self {
            config,
            font,
            image: RgbaImage::new(0, 0),
            layout: Layout::default(),
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Paints `grid` as nearest-neighbour cells scaled to the grid's own
    /// value range, with the colour bar on the right. Fails without touching
    /// the surface when the image would exceed [`MAX_IMAGE_DIMENSION`].
    pub fn draw(&mut self, grid: &Grid) -> Result<&RgbaImage> {
        let (min, max) = grid.value_range();
        let legend = Legend::for_range(min, max);
        let scale = PxScale::from(self.config.font_size);

        let layout = self.compute_layout(grid, &legend, scale)?;
        self.resize(layout.width, layout.height);
        self.layout = layout;

        let colormap = self.config.colormap;
        let rows = grid.height() as u32;
        for (r, row) in grid.rows().enumerate() {
            let screen_row = if self.config.flip_vertical {
                rows - 1 - r as u32
            } else {
                r as u32
            };
            for (c, &value) in row.iter().enumerate() {
                // NaN cells stay background.
                if !value.is_finite() {
                    continue;
                }
                let (x, y) = layout.cell_origin(screen_row, c as u32);
                let rect =
                    Rect::at(x as i32, y as i32).of_size(layout.cell_size, layout.cell_size);
                draw_filled_rect_mut(&mut self.image, rect, colormap.map(value, min, max));
            }
        }

        legend.draw(
            &mut self.image,
            layout.bar_x,
            layout.grid_y,
            layout.bar_width,
            layout.grid_height(),
            colormap,
            &self.font,
            scale,
        );

        Ok(&self.image)
    }

    /// Writes the current surface as PNG.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// Resets every pixel to the background colour.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = BACKGROUND;
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() == (width, height) {
            self.clear();
        } else {
            self.image = RgbaImage::from_pixel(width, height, BACKGROUND);
        }
    }

    fn compute_layout(&self, grid: &Grid, legend: &Legend, scale: PxScale) -> Result<Layout> {
        let cfg = &self.config;
        let cell_size = cfg.cell_size;
        let too_large = || RenderError::ImageTooLarge {
            rows: grid.height(),
            cols: grid.width(),
            max: MAX_IMAGE_DIMENSION,
        };
        let cols = u32::try_from(grid.width()).map_err(|_| too_large())?;
        let rows = u32::try_from(grid.height()).map_err(|_| too_large())?;
        let grid_width = cols.checked_mul(cell_size).ok_or_else(too_large)?;
        let grid_height = rows.checked_mul(cell_size).ok_or_else(too_large)?;

        // Labels are centred on their tick, so half a line can poke out above
        // and below the grid.
        let half_line = (cfg.font_size / 2.0).ceil() as u32;
        let grid_x = cfg.margin;
        let grid_y = checked_sum(&[cfg.margin, half_line]).ok_or_else(too_large)?;
        let bar_x = checked_sum(&[grid_x, grid_width, LEGEND_GAP]).ok_or_else(too_large)?;
        let label_width = legend.label_width(&self.font, scale);

        let width = checked_sum(&[
            bar_x,
            cfg.legend_width,
            TICK_LENGTH,
            LABEL_PADDING,
            label_width,
            cfg.margin,
        ])
        .ok_or_else(too_large)?;
        let height = checked_sum(&[grid_y, grid_height, half_line, cfg.margin])
            .ok_or_else(too_large)?;
        if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
            return Err(too_large());
        }

        Ok(Layout {
            width,
            height,
            grid_x,
            grid_y,
            cell_size,
            rows,
            cols,
            bar_x,
            bar_width: cfg.legend_width,
        })
    }
}

fn checked_sum(parts: &[u32]) -> Option<u32> {
    parts.iter().try_fold(0u32, |acc, &part| acc.checked_add(part))
}
