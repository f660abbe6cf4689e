use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use ahash::AHashMap;
use common::vfile::FileSource;
use rayon::prelude::*;

use crate::{
    bsp::{consts::TEXTURE_SUBFOLDER, gamelump::load_static_props, BspFile, BspLevel},
    error::{BspError, BspResult},
    materials::{MaterialBinder, MaterialRegistry},
    meshes::build_model,
    scene::Model,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModelExportFormat {
    #[default]
    SEAsset,
    Obj,
    XnaLaraText,
    XnaLaraBinary,
    Smd,
    XModel,
    Fbx,
    Maya,
    Cast,
}

impl ModelExportFormat {
    pub const ALL: [ModelExportFormat; 9] = [
        ModelExportFormat::SEAsset,
        ModelExportFormat::Obj,
        ModelExportFormat::XnaLaraText,
        ModelExportFormat::XnaLaraBinary,
        ModelExportFormat::Smd,
        ModelExportFormat::XModel,
        ModelExportFormat::Fbx,
        ModelExportFormat::Maya,
        ModelExportFormat::Cast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelExportFormat::SEAsset => "semodel",
            ModelExportFormat::Obj => "obj",
            ModelExportFormat::XnaLaraText => "xna_text",
            ModelExportFormat::XnaLaraBinary => "xna_binary",
            ModelExportFormat::Smd => "smd",
            ModelExportFormat::XModel => "xmodel",
            ModelExportFormat::Fbx => "fbx",
            ModelExportFormat::Maya => "maya",
            ModelExportFormat::Cast => "cast",
        }
    }

    /// Case insensitive lookup by [`ModelExportFormat::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// Writes a [`Model`] in one particular 3D format.
pub trait SceneExporter: Send + Sync {
    /// Extension of the written file, including the dot.
    fn model_extension(&self) -> &str;
    fn export_model(&self, model: &Model, path: &Path) -> io::Result<()>;
}

/// Scene exporters linked into the build, by format.
#[derive(Default, Clone)]
pub struct Exporters {
    exporters: AHashMap<ModelExportFormat, Arc<dyn SceneExporter>>,
}

impl Exporters {
    pub fn register(&mut self, format: ModelExportFormat, exporter: Arc<dyn SceneExporter>) {
        self.exporters.insert(format, exporter);
    }

    /// The exporter for `format`, falling back to the default format's.
    pub fn select(&self, format: ModelExportFormat) -> Option<&Arc<dyn SceneExporter>> {
        self.exporters.get(&format).or_else(|| {
            if format != ModelExportFormat::default() {
                log::warn!(
                    "No {} exporter, falling back to {}",
                    format.name(),
                    ModelExportFormat::default().name()
                );
            }
            self.exporters.get(&ModelExportFormat::default())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }

    pub fn require(&self, format: ModelExportFormat) -> BspResult<&Arc<dyn SceneExporter>> {
        self.select(format).ok_or(BspError::NoExporter(format))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub name: String,
    pub meshes: usize,
    pub materials: usize,
    pub props: usize,
    pub scene_path: Option<PathBuf>,
    pub props_path: PathBuf,
}

/// Where the files of one exported level go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportLayout {
    pub name: String,
    pub model_dir: PathBuf,
    pub texture_dir: PathBuf,
}

impl ExportLayout {
    pub fn new(asset: &Path, output: &Path) -> Self {
        let name = asset
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let model_dir = output.join(&name);
        let texture_dir = model_dir.join(TEXTURE_SUBFOLDER);

        Self {
            name,
            model_dir,
            texture_dir,
        }
    }

    pub fn scene_path(&self, extension: &str) -> PathBuf {
        self.model_dir.join(format!("{}_LOD0{}", self.name, extension))
    }

    pub fn props_path(&self) -> PathBuf {
        self.model_dir.join(format!("{}_LOD0.mprt", self.name))
    }
}

/// Decodes one level and writes its scene and static props under `output`.
///
/// The scene is written before the game lump is decoded, so a level with a
/// bad static prop lump fails but leaves its scene file behind. Without an
/// exporter only the `.mprt` is written.
pub fn export_bsp<R: MaterialRegistry + ?Sized>(
    asset: &Path,
    output: &Path,
    registry: &R,
    exporter: Option<&dyn SceneExporter>,
    files: Arc<dyn FileSource>,
) -> BspResult<ExportSummary> {
    let mut file = BspFile::open_with(asset, files)?;
    let level = BspLevel::load(&mut file)?;

    let layout = ExportLayout::new(asset, output);
    fs::create_dir_all(&layout.texture_dir)?;

    let binder = MaterialBinder::new(registry, &layout.texture_dir);
    let model = build_model(&level, &layout.name, &binder)?;

    let scene_path = match exporter {
        Some(exporter) => {
            let path = layout.scene_path(exporter.model_extension());
            exporter
                .export_model(&model, &path)
                .map_err(|source| BspError::Export {
                    path: path.clone(),
                    source,
                })?;
            Some(path)
        }
        None => {
            log::debug!("No scene exporter, skipping the geometry of {}", layout.name);
            None
        }
    };

    let props = load_static_props(&level.game_lump)?;
    let props_path = layout.props_path();
    let mut writer = BufWriter::new(File::create(&props_path)?);
    props.write_mprt(&mut writer)?;
    writer.flush()?;

    let summary = ExportSummary {
        name: layout.name,
        meshes: model.meshes.len(),
        materials: model.materials.len(),
        props: props.props.len(),
        scene_path,
        props_path,
    };

    log::info!(
        "Exported {}: {} meshes, {} materials, {} static props",
        summary.name,
        summary.meshes,
        summary.materials,
        summary.props
    );

    Ok(summary)
}

/// Exports every asset in parallel. A failing asset is logged and reported
/// in its slot of the result without stopping the others.
pub fn export_batch<R: MaterialRegistry + ?Sized>(
    assets: &[PathBuf],
    output: &Path,
    registry: &R,
    exporter: Option<&dyn SceneExporter>,
    files: Arc<dyn FileSource>,
) -> Vec<(PathBuf, BspResult<ExportSummary>)> {
    assets
        .par_iter()
        .map(|asset| {
            let result = export_bsp(asset, output, registry, exporter, files.clone());
            if let Err(e) = &result {
                log::error!("Failed to export {:?}: {}", asset, e);
            }
            (asset.clone(), result)
        })
        .collect()
}
