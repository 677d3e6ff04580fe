//! Board heatmaps: renders the averaged per-square evaluation tables in
//! `boards.json` as colour-mapped PNG images with a colour-scale legend.
//!
//! Pipeline: load records -> reshape each board into rows of 8 -> draw on a
//! reused canvas -> save -> clear.

pub mod colormap;
pub mod config;
pub mod error;
pub mod grid;
pub mod legend;
pub mod pipeline;
pub mod record;
pub mod render;

pub use colormap::Colormap;
pub use config::RenderConfig;
pub use error::RenderError;
pub use grid::{BOARD_WIDTH, Grid};
pub use record::{BoardRecord, ConditionValue};
pub use render::HeatmapCanvas;
