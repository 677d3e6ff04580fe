//! Error types for reshaping and rendering boards.
//! Application code wraps these in `anyhow` with the record name attached.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Board length is not a whole number of rows.
    #[error("cannot reshape board of length {len} into rows of width {width}")]
    MisalignedBoard { len: usize, width: usize },

    #[error("board has no values")]
    EmptyBoard,

    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    /// Grid and settings together exceed the largest supported image.
    #[error("a {rows}x{cols} board does not fit in a {max}px image at this cell size")]
    ImageTooLarge { rows: usize, cols: usize, max: u32 },

    #[error("failed to load embedded legend font")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("failed to write image")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
