use std::path::{Path, PathBuf};

use ini::{Ini, Properties};

use crate::{
    error::{BspError, BspResult},
    export::ModelExportFormat,
    materials::{ExtractedMaterial, MaterialEntry, MaterialTable},
};

const EXPORT_SECTION: &str = "export";
const MATERIAL_PREFIX: &str = "material.";

/// An export job: which maps to decode, where to put them and the materials
/// they may reference.
#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub output: PathBuf,
    pub format: ModelExportFormat,
    pub maps: Vec<PathBuf>,
    pub materials: MaterialTable,
}

impl ExportConfig {
    pub fn load(path: &Path) -> BspResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| BspError::Config {
            reason: format!("{path:?}: {e}"),
        })?;
        let root = path.parent().unwrap_or(Path::new(""));

        Self::from_ini(&ini, root)
    }

    /// Relative paths in `ini` are taken from `root`.
    pub fn from_ini(ini: &Ini, root: &Path) -> BspResult<Self> {
        let export = ini
            .section(Some(EXPORT_SECTION))
            .ok_or_else(|| BspError::Config {
                reason: format!("missing [{EXPORT_SECTION}] section"),
            })?;

        let output = root.join(export.get("output").unwrap_or("out"));

        let format = match export.get("format") {
            Some(name) => ModelExportFormat::from_name(name).unwrap_or_else(|| {
                log::warn!(
                    "Unknown model format {name}, using {}",
                    ModelExportFormat::default().name()
                );
                ModelExportFormat::default()
            }),
            None => ModelExportFormat::default(),
        };

        let maps: Vec<PathBuf> = export.get_all("map").map(|map| root.join(map)).collect();

        let mut materials = MaterialTable::default();
        materials.source_dir = export.get("textures").map(|dir| root.join(dir));

        for (section, properties) in ini.iter() {
            let Some(name) = section.and_then(|s| s.strip_prefix(MATERIAL_PREFIX)) else {
                continue;
            };
            materials.insert(material_entry(name, properties)?);
        }

        log::debug!(
            "Export job: {} maps to {:?} as {:?}, {} materials",
            maps.len(),
            output,
            format,
            materials.len()
        );

        Ok(Self {
            output,
            format,
            maps,
            materials,
        })
    }
}

fn material_entry(name: &str, properties: &Properties) -> BspResult<MaterialEntry> {
    let hash = match properties.get("hash") {
        Some(hash) => parse_hash(hash).ok_or_else(|| BspError::Config {
            reason: format!("material {name} has an invalid hash {hash:?}"),
        })?,
        None => 0,
    };

    let texture = |key: &str| properties.get(key).map(str::to_owned);

    Ok(MaterialEntry {
        name: name.to_owned(),
        hash,
        textures: ExtractedMaterial {
            albedo: texture("albedo"),
            normal: texture("normal"),
            gloss: texture("gloss"),
            specular: texture("specular"),
            emissive: texture("emissive"),
            ambient_occlusion: texture("ao"),
            cavity: texture("cavity"),
            ..Default::default()
        },
    })
}

fn parse_hash(value: &str) -> Option<u64> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}
