use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::Parser;
use common::prelude::*;
use rbsp::prelude::*;

/// Decodes rBSP levels into scene files and static prop listings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Export job (.ini) listing the maps, output folder, format and materials
    #[arg(required_unless_present = "readout", conflicts_with = "readout")]
    job: Option<PathBuf>,

    /// Print the lump directory and decoded lump counts of each map instead of exporting
    #[arg(long, num_args = 1.., value_name = "MAP")]
    readout: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let ok = match &args.job {
        Some(job) => match export(job) {
            Ok(ok) => ok,
            Err(e) => {
                log::error!("{:?}: {}", job, e);
                false
            }
        },
        None => args.readout.iter().fold(true, |ok, map| match readout(map) {
            Ok(()) => ok,
            Err(e) => {
                log::error!("{:?}: {}", map, e);
                false
            }
        }),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Dumps the directory and decoded lump sizes of a level.
fn readout(path: &Path) -> BspResult<()> {
    let mut file = BspFile::open(path)?;
    file.describe();

    let level = BspLevel::load(&mut file)?;
    let props = load_static_props(&level.game_lump)?;

    log::info!(
        "{:?}: {} models, {} meshes, {} materials, {} textures, {} positions, {} static props",
        path,
        level.models.len(),
        level.meshes.len(),
        level.materials.len(),
        level.textures.len(),
        level.vertices.len(),
        props.props.len()
    );
    Ok(())
}

/// Runs an export job, returning whether every map exported.
fn export(job: &Path) -> BspResult<bool> {
    let config = ExportConfig::load(job)?;

    let exporters = Exporters::default();
    let exporter = if exporters.is_empty() {
        log::info!("No scene exporters linked, writing static props only");
        None
    } else {
        exporters.select(config.format).map(|e| e.as_ref())
    };

    let results = export_batch(
        &config.maps,
        &config.output,
        &config.materials,
        exporter,
        Arc::new(DiskFiles),
    );

    let failed: Vec<&PathBuf> = results
        .iter()
        .filter(|(_, result)| result.is_err())
        .map(|(path, _)| path)
        .collect();

    log::info!(
        "Exported {} of {} maps to {:?}",
        results.len() - failed.len(),
        results.len(),
        config.output
    );
    for path in &failed {
        log::error!("Failed: {:?}", path);
    }

    Ok(failed.is_empty())
}
