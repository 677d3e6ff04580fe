//! Renders every board record to its own PNG.
//! Strictly sequential: name, reshape, draw, save and clear one record
//! before moving to the next. The first failure aborts the run.

use crate::config::RenderConfig;
use crate::grid::Grid;
use crate::record::{self, BoardRecord};
use crate::render::HeatmapCanvas;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Renders one record onto `canvas` and writes it to `out_dir`.
/// The canvas is cleared afterwards so the next record starts blank.
pub fn render_record(
    record: &BoardRecord,
    out_dir: &Path,
    canvas: &mut HeatmapCanvas,
) -> Result<PathBuf> {
    let name = record.output_file_name();
    let grid = Grid::from_board(&record.board)
        .with_context(|| format!("Failed to reshape board for {}", name))?;

    debug!(
        name = %name,
        rows = grid.height(),
        num_cases = ?record.num_cases,
        "rendering board"
    );

    canvas
        .draw(&grid)
        .with_context(|| format!("Failed to render board for {}", name))?;
    let path = out_dir.join(&name);
    canvas
        .save(&path)
        .with_context(|| format!("Failed to save image {}", path.display()))?;
    canvas.clear();

    Ok(path)
}

/// Renders `records` in order, printing each output name to `progress`
/// before its image is produced. Returns the written paths in the same order.
pub fn render_records<W: Write>(
    records: &[BoardRecord],
    out_dir: &Path,
    canvas: &mut HeatmapCanvas,
    progress: &mut W,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(records.len());
    for record in records {
        writeln!(progress, "{}", record.output_file_name())
            .context("Failed to write progress output")?;
        written.push(render_record(record, out_dir, canvas)?);
    }
    Ok(written)
}

/// Loads `input` and renders every record into `out_dir`.
pub fn run<W: Write>(
    input: &Path,
    out_dir: &Path,
    config: RenderConfig,
    progress: &mut W,
) -> Result<Vec<PathBuf>> {
    let start = Instant::now();

    let records = record::load_records(input)?;
    info!(count = records.len(), input = %input.display(), "loaded board records");

    let mut canvas = HeatmapCanvas::new(config).context("Failed to set up heatmap canvas")?;
    let written = render_records(&records, out_dir, &mut canvas, progress)?;

    info!(
        count = written.len(),
        out_dir = %out_dir.display(),
        elapsed = ?start.elapsed(),
        "wrote heatmaps"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ConditionValue;
    use image::GenericImageView;

    fn record(piece: &str, value: u64, board_len: usize) -> BoardRecord {
        BoardRecord {
            piece: piece.to_string(),
            condition: "Number of Enemies".to_string(),
            condition_value: ConditionValue::Number(serde_json::Number::from(value)),
            board: (0..board_len).map(|i| i as f64).collect(),
            num_cases: Some(10),
        }
    }

    #[test]
    fn test_render_record_writes_named_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = HeatmapCanvas::new(RenderConfig::default()).unwrap();
        let path = render_record(&record("white rook", 4, 64), dir.path(), &mut canvas).unwrap();

        assert_eq!(path, dir.path().join("whiterook_numberofenemies_4.png"));
        let img = image::open(&path).unwrap();
        let layout = canvas.layout();
        assert_eq!(img.dimensions(), (layout.width, layout.height));
        // Surface is reset after saving.
        assert!(canvas.image().pixels().all(|p| *p == crate::render::BACKGROUND));
    }

    #[test]
    fn test_misaligned_board_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = HeatmapCanvas::new(RenderConfig::default()).unwrap();
        let err =
            render_record(&record("black queen", 1, 63), dir.path(), &mut canvas).unwrap_err();

        assert!(format!("{:#}", err).contains("cannot reshape board of length 63"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_render_records_prints_names_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = HeatmapCanvas::new(RenderConfig::default()).unwrap();
        let records = vec![record("white pawn", 2, 64), record("black king", 9, 64)];
        let mut progress = Vec::new();

        let written = render_records(&records, dir.path(), &mut canvas, &mut progress).unwrap();

        let printed = String::from_utf8(progress).unwrap();
        assert_eq!(
            printed,
            "whitepawn_numberofenemies_2.png\nblackking_numberofenemies_9.png\n"
        );
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![
            "whitepawn_numberofenemies_2.png",
            "blackking_numberofenemies_9.png"
        ]);
    }

    #[test]
    fn test_failure_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = HeatmapCanvas::new(RenderConfig::default()).unwrap();
        let records = vec![
            record("white pawn", 1, 64),
            record("white pawn", 2, 60),
            record("white pawn", 3, 64),
        ];
        let mut progress = Vec::new();

        assert!(render_records(&records, dir.path(), &mut canvas, &mut progress).is_err());
        assert!(dir.path().join("whitepawn_numberofenemies_1.png").exists());
        assert!(!dir.path().join("whitepawn_numberofenemies_3.png").exists());
    }
}
