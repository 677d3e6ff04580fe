use anyhow::{Context, Result, anyhow};
use board_heatmap::config::MAX_PIXEL_SETTING;
use board_heatmap::{Colormap, RenderConfig, pipeline};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_INPUT: &str = "boards.json";
const DEFAULT_OUT_DIR: &str = ".";

fn main() -> Result<()> {
    // Parse CLI arguments
    let matches = Command::new("board-heatmap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders per-square board tables from boards.json as heatmap PNGs")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("JSON file of board records")
                .default_value(DEFAULT_INPUT)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("Directory the images are written to")
                .default_value(DEFAULT_OUT_DIR)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON render config; flags below override it")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("colormap")
                .long("colormap")
                .value_name("NAME")
                .help("Colour scale for cells and legend")
                .value_parser(Colormap::NAMES),
        )
        .arg(
            Arg::new("cell-size")
                .long("cell-size")
                .value_name("PX")
                .help("Pixel size of one board square")
                .value_parser(value_parser!(u32).range(1..=i64::from(MAX_PIXEL_SETTING))),
        )
        .arg(
            Arg::new("flip")
                .long("flip")
                .help("Draw the last row at the top (rank 8 up)")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging();

    let input = matches
        .get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let out_dir = matches
        .get_one::<PathBuf>("out-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    let config = build_config(&matches)?;

    tracing::debug!(?config, "render config");

    let mut stdout = io::stdout().lock();
    pipeline::run(&input, &out_dir, config, &mut stdout)?;
    Ok(())
}

/// Logs go to stderr so stdout carries only the generated file names.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then individual flags.
fn build_config(matches: &ArgMatches) -> Result<RenderConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    if let Some(name) = matches.get_one::<String>("colormap") {
        config.colormap = name.parse::<Colormap>().map_err(|e| anyhow!(e))?;
    }
    if let Some(&cell_size) = matches.get_one::<u32>("cell-size") {
        config.cell_size = cell_size;
    }
    if matches.get_flag("flip") {
        config.flip_vertical = true;
    }

    config.validate().context("Invalid render settings")?;
    Ok(config)
}
