use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use eframe::{NativeOptions, run_native};
use heightmap::{ConfigError, GeneratorConfig, MAX_EXPONENT};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod render;
mod viewer;

use viewer::HeightmapViewer;

#[derive(Parser, Debug)]
#[command(name = "heightmap")]
#[command(about = "Generate diamond-square terrain heightmaps")]
struct Args {
    /// JSON generator config with `size`, `roughness` and `seed`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid exponent n, giving a (2^n + 1)×(2^n + 1) grid
    #[arg(
        short = 'n',
        long,
        conflicts_with = "size",
        value_parser = clap::value_parser!(u32).range(1..=MAX_EXPONENT as i64)
    )]
    exponent: Option<u32>,

    /// Grid side length, must be 2^n + 1
    #[arg(long)]
    size: Option<usize>,

    /// Initial displacement amplitude, halved every level
    #[arg(short, long)]
    roughness: Option<f64>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the heightmap to this PNG and exit instead of opening the viewer
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Export plain grayscale instead of shaded terrain colours
    #[arg(long, requires = "export")]
    gray: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Heightmap(#[from] heightmap::Error),
    #[error("failed to write {path:?}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("viewer failed: {0}")]
    Viewer(String),
}

// Config file (or defaults) with command-line overrides on top
fn resolve_config(args: &Args) -> Result<GeneratorConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_path(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(exp) = args.exponent {
        config.size = GeneratorConfig::from_exponent(exp)?.size;
    }
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(roughness) = args.roughness {
        config.roughness = roughness;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn export(config: &GeneratorConfig, path: &Path, gray: bool) -> Result<(), AppError> {
    let grid = config.generate()?;
    let saved = if gray {
        render::grayscale(&grid).save(path)
    } else {
        render::terrain_rgb(&grid, grid.size() as f64 * render::SHADE_Z_PER_CELL).save(path)
    };
    saved.map_err(|source| AppError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        size = config.size,
        roughness = config.roughness,
        seed = config.seed,
        "heightmap.exported"
    );
    Ok(())
}

fn run(args: Args) -> Result<(), AppError> {
    let config = resolve_config(&args)?;

    if let Some(path) = &args.export {
        return export(&config, path, args.gray);
    }

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    run_native(
        "Diamond–Square Heightmap",
        opts,
        Box::new(move |_cc| Ok(Box::new(HeightmapViewer::new(config)))),
    )
    .map_err(|e| AppError::Viewer(e.to_string()))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "heightmap.failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, Args, resolve_config};
    use clap::Parser;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("heightmap").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let config = resolve_config(&parse(&[])).unwrap();
        assert_eq!(config, heightmap::GeneratorConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve_config(&parse(&["-n", "5", "-r", "1.5", "-s", "12"])).unwrap();
        assert_eq!(config.size, 33);
        assert_eq!(config.roughness, 1.5);
        assert_eq!(config.seed, 12);
    }

    #[test]
    fn even_size_is_rejected() {
        let err = resolve_config(&parse(&["--size", "64"])).unwrap_err();
        assert!(matches!(err, AppError::Heightmap(e) if e.is_invalid_argument()));
    }

    #[test]
    fn oversized_exponent_is_refused_not_panicking() {
        assert!(Args::try_parse_from(["heightmap", "-n", "64"]).is_err());
        assert!(Args::try_parse_from(["heightmap", "-n", "0"]).is_err());
        assert!(Args::try_parse_from(["heightmap", "-n", "16"]).is_ok());

        // Bypassing the parser still yields an error rather than a panic
        let mut args = parse(&[]);
        args.exponent = Some(64);
        let err = resolve_config(&args).unwrap_err();
        assert!(matches!(err, AppError::Heightmap(e) if e.is_invalid_argument()));
    }

    #[test]
    fn huge_roughness_is_rejected() {
        let err = resolve_config(&parse(&["-r", "1e308"])).unwrap_err();
        assert!(matches!(err, AppError::Heightmap(e) if e.is_invalid_argument()));
    }

    #[test]
    fn exponent_and_size_conflict() {
        assert!(Args::try_parse_from(["heightmap", "-n", "5", "--size", "33"]).is_err());
    }

    #[test]
    fn gray_needs_export() {
        assert!(Args::try_parse_from(["heightmap", "--gray"]).is_err());
    }
}
