use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ahash::AHashMap;

use crate::{
    bsp::{
        consts::{PLACEHOLDER_MATERIAL_HASH, TEXTURE_SUBFOLDER},
        textures::normalize_name,
    },
    scene::{MaterialSlot, Model},
};

pub type AssetId = u64;

/// What the registry hands back after extracting a material's textures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedMaterial {
    pub material_name: String,
    pub albedo_hash: u64,
    pub albedo: Option<String>,
    pub normal: Option<String>,
    pub gloss: Option<String>,
    pub specular: Option<String>,
    pub emissive: Option<String>,
    pub ambient_occlusion: Option<String>,
    pub cavity: Option<String>,
}

impl ExtractedMaterial {
    /// Texture file names that were actually extracted, by slot.
    pub fn maps(&self) -> impl Iterator<Item = (MaterialSlot, &str)> {
        [
            (MaterialSlot::Albedo, &self.albedo),
            (MaterialSlot::Normal, &self.normal),
            (MaterialSlot::Gloss, &self.gloss),
            (MaterialSlot::Specular, &self.specular),
            (MaterialSlot::Emissive, &self.emissive),
            (MaterialSlot::AmbientOcclusion, &self.ambient_occlusion),
            (MaterialSlot::Cavity, &self.cavity),
        ]
        .into_iter()
        .filter_map(|(slot, file)| match file.as_deref() {
            Some(file) if !file.is_empty() => Some((slot, file)),
            _ => None,
        })
    }
}

/// External store of materials and their textures.
pub trait MaterialRegistry: Sync {
    fn list_materials(&self) -> Vec<(String, AssetId)>;

    /// Writes the textures of `asset` into `texture_dir`.
    fn extract_material(&self, asset: AssetId, texture_dir: &Path) -> io::Result<ExtractedMaterial>;
}

/// Resolves surface names to registry materials for one export.
pub struct MaterialBinder<'a, R: MaterialRegistry + ?Sized> {
    registry: &'a R,
    texture_dir: PathBuf,
    lookup: AHashMap<String, AssetId>,
}

impl<'a, R: MaterialRegistry + ?Sized> MaterialBinder<'a, R> {
    pub fn new(registry: &'a R, texture_dir: impl Into<PathBuf>) -> Self {
        let mut lookup = AHashMap::new();
        for (name, asset) in registry.list_materials() {
            lookup.entry(normalize_name(&name)).or_insert(asset);
        }

        Self {
            registry,
            texture_dir: texture_dir.into(),
            lookup,
        }
    }

    pub fn lookup(&self, key: &str) -> Option<AssetId> {
        self.lookup.get(&normalize_name(key)).copied()
    }

    pub fn texture_dir(&self) -> &Path {
        &self.texture_dir
    }

    /// Appends the material for `key` to `model` and returns its index.
    /// Unknown or unextractable materials get a placeholder.
    pub fn bind(&self, key: &str, model: &mut Model) -> usize {
        let Some(asset) = self.lookup(key) else {
            log::debug!("No material named {key}, using a placeholder");
            return model.add_material(key, PLACEHOLDER_MATERIAL_HASH);
        };

        match self.registry.extract_material(asset, &self.texture_dir) {
            Ok(extracted) => {
                let index = model.add_material(&extracted.material_name, extracted.albedo_hash);
                let material = &mut model.materials[index];
                for (slot, file) in extracted.maps() {
                    material
                        .slots
                        .insert(slot, format!("{TEXTURE_SUBFOLDER}\\{file}"));
                }
                index
            }
            Err(e) => {
                log::warn!("Failed to extract material {key}: {e}");
                model.add_material(key, PLACEHOLDER_MATERIAL_HASH)
            }
        }
    }
}

/// A registry entry described by hand, usually from an export config.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialEntry {
    pub name: String,
    pub hash: u64,
    pub textures: ExtractedMaterial,
}

/// A registry backed by a list of material entries. When `source_dir` is
/// set, extraction copies each texture from it into the texture directory.
#[derive(Clone, Debug, Default)]
pub struct MaterialTable {
    entries: Vec<MaterialEntry>,
    pub source_dir: Option<PathBuf>,
}

impl MaterialTable {
    pub fn insert(&mut self, entry: MaterialEntry) -> AssetId {
        self.entries.push(entry);
        (self.entries.len() - 1) as AssetId
    }

    pub fn entries(&self) -> &[MaterialEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MaterialRegistry for MaterialTable {
    fn list_materials(&self) -> Vec<(String, AssetId)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i as AssetId))
            .collect()
    }

    fn extract_material(&self, asset: AssetId, texture_dir: &Path) -> io::Result<ExtractedMaterial> {
        let entry = self.entries.get(asset as usize).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no material asset {asset}"))
        })?;

        let mut extracted = entry.textures.clone();
        extracted.material_name = entry.name.clone();
        extracted.albedo_hash = entry.hash;

        if let Some(source_dir) = &self.source_dir {
            fs::create_dir_all(texture_dir)?;
            for (_slot, file) in extracted.maps() {
                fs::copy(source_dir.join(file), texture_dir.join(file))?;
            }
        }

        Ok(extracted)
    }
}
