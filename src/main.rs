//! keystone-mount CLI
//!
//! Builds every mount in a catalog and writes one file per mount.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use keystone_mount::catalog::{Catalog, build_all, collect_models};
use keystone_mount::config::BuildConfig;
use keystone_mount::io::stl::StlFile;
use keystone_mount::io::{IoError, ModelFile};
use keystone_mount::mesh::{Mesh, MeshEngine};
use keystone_mount::scad::{ScadEngine, ScadFile, ScadTree};
use keystone_mount::{GeometryEngine, MountBuilder, MountSpec};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// OpenSCAD source, one tree per mount
    Scad,
    /// Binary STL, evaluated with the built-in mesh engine
    Stl,
    /// ASCII STL, evaluated with the built-in mesh engine
    StlAscii,
}

#[derive(Parser)]
#[command(name = "keystone-mount")]
#[command(about = "Generate threaded panel mounts for Keystone modules", long_about = None)]
struct Cli {
    /// TOML catalog to build instead of the built-in list
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Output directory
    #[arg(short, long, default_value = "out")]
    out: PathBuf,
    #[arg(short, long, value_enum, default_value_t = Format::Scad)]
    format: Format,
    /// Clearance in mm, overrides the catalog's
    #[arg(short, long)]
    tolerance: Option<f64>,
    /// Only build mounts with this output name (repeatable)
    #[arg(long)]
    only: Vec<String>,
    /// Segments per full circle
    #[arg(long)]
    segments: Option<usize>,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut catalog = match &cli.catalog {
        Some(path) => Catalog::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Catalog::default(),
    };
    if let Some(tolerance) = cli.tolerance {
        catalog.tolerance = tolerance;
    }
    if !cli.only.is_empty() {
        catalog.retain_names(&cli.only);
        if catalog.mounts.is_empty() {
            bail!("no catalog entry is named {}", cli.only.join(", "));
        }
    }

    let mut config = catalog.config();
    if let Some(segments) = cli.segments {
        config.resolution = config.resolution.with_segments(segments);
    }
    config.validate().context("invalid build settings")?;

    tracing::info!(
        mounts = catalog.mounts.len(),
        tolerance = config.tolerance,
        format = ?cli.format,
        out = %cli.out.display(),
        "building catalog"
    );

    let failed = match cli.format {
        Format::Scad => run(
            &ScadEngine::new(config.resolution),
            &config,
            &catalog.mounts,
            &cli.out,
            |solid: &ScadTree, dir: &Path, name: &str| ScadFile { root: solid }.write_to(dir, name),
        ),
        Format::Stl | Format::StlAscii => {
            let ascii = cli.format == Format::StlAscii;
            run(
                &MeshEngine::new(config.resolution),
                &config,
                &catalog.mounts,
                &cli.out,
                |mesh: &Mesh, dir: &Path, name: &str| StlFile { mesh, ascii }.write_to(dir, name),
            )
        },
    };

    if failed > 0 {
        tracing::error!(failed, "some mounts were not written");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Builds and writes every mount, returning how many failed.
fn run<E, W>(engine: &E, config: &BuildConfig, specs: &[MountSpec], out: &Path, write: W) -> usize
where
    E: GeometryEngine + Sync,
    E::Solid: Send,
    W: Fn(&E::Solid, &Path, &str) -> Result<PathBuf, IoError>,
{
    let builder = MountBuilder::new(engine, config);
    let reports = build_all(&builder, specs);
    let mut failed = reports.iter().filter(|report| !report.is_ok()).count();

    let models = collect_models(reports.into_iter().filter_map(|report| report.result.ok()));
    for model in &models {
        match write(&model.solid, out, &model.name) {
            Ok(path) => tracing::info!(name = %model.name, path = %path.display(), "wrote mount"),
            Err(err) => {
                tracing::error!(name = %model.name, error = %err, "could not write mount");
                failed += 1;
            },
        }
    }
    failed
}
