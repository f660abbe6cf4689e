//! Synthetic rBSP files for tests.

use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::Arc,
};

use bytemuck::{Pod, Zeroable};
use common::vfile::VFileSystem;
use glam::{vec2, vec3, Vec3};

use crate::bsp::{
    consts::{LumpType, PROP_NAME_LENGTH, RBSP_MAGIC},
    gamelump::{StaticPropHeader, StaticPropLump},
    lump::{sidecar_path, BspFile, BspLump},
    mesh::BspMesh,
    model::BspModel,
    textures::{BspMaterial, BspTexture},
    vertex::VertexLitFlat,
};

pub const TEST_BASE: &str = "maps/test";

#[derive(Clone, Debug)]
pub struct BspBuilder {
    version: u16,
    lump_count: usize,
    streamed: bool,
    lumps: Vec<(LumpType, Vec<u8>)>,
}

impl BspBuilder {
    pub fn new() -> Self {
        Self {
            version: 0x32,
            lump_count: 128,
            streamed: false,
            lumps: Vec::new(),
        }
    }

    pub fn version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    pub fn lump_count(mut self, lump_count: usize) -> Self {
        self.lump_count = lump_count;
        self
    }

    pub fn streamed(mut self, streamed: bool) -> Self {
        self.streamed = streamed;
        self
    }

    pub fn lump(mut self, lump: LumpType, data: Vec<u8>) -> Self {
        self.lumps.retain(|(l, _)| *l != lump);
        self.lumps.push((lump, data));
        self
    }

    pub fn records<T: Pod>(self, lump: LumpType, records: &[T]) -> Self {
        self.lump(lump, bytemuck::cast_slice(records).to_vec())
    }

    /// Header, directory and, unless streamed, the payloads.
    pub fn build(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&RBSP_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&(self.streamed as u16).to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&(self.lump_count as u32 - 1).to_le_bytes());

        let mut directory = vec![BspLump::default(); self.lump_count];
        let mut payload = Vec::new();
        let data_start = bytes.len() + self.lump_count * std::mem::size_of::<BspLump>();

        for (lump, data) in &self.lumps {
            let Some(entry) = directory.get_mut(lump.id() as usize) else {
                continue;
            };
            entry.data_size = data.len() as u32;
            if !self.streamed {
                entry.offset = (data_start + payload.len()) as u32;
                payload.extend_from_slice(data);
            }
        }

        bytes.extend_from_slice(bytemuck::cast_slice(&directory));
        bytes.extend_from_slice(&payload);
        bytes
    }

    /// One sidecar file per lump, named after `base`.
    pub fn sidecars(&self, base: &Path) -> VFileSystem {
        let mut files = VFileSystem::default();
        for (lump, data) in &self.lumps {
            files.insert(sidecar_path(base, *lump), data.clone());
        }
        files
    }

    pub fn open(&self) -> BspFile {
        BspFile::from_reader(
            Cursor::new(self.build()),
            PathBuf::from(TEST_BASE),
            Arc::new(self.sidecars(Path::new(TEST_BASE))),
        )
        .unwrap()
    }
}

/// One model with one flat lit mesh: a unit quad made of two triangles.
pub fn quad_level(texture: &str) -> BspBuilder {
    let positions = [
        vec3(0.0, 0.0, 0.0),
        vec3(1.0, 0.0, 0.0),
        vec3(1.0, 1.0, 0.0),
        vec3(0.0, 1.0, 0.0),
    ];
    let uvs = [
        vec2(0.0, 0.0),
        vec2(1.0, 0.0),
        vec2(1.0, 1.0),
        vec2(0.0, 1.0),
    ];
    let vertices: Vec<VertexLitFlat> = (0..4)
        .map(|i| VertexLitFlat {
            position_index: i,
            normal_index: 0,
            uv: uvs[i as usize],
            unknown: 0,
        })
        .collect();

    let mut names = texture.as_bytes().to_vec();
    names.push(0);

    BspBuilder::new()
        .records(
            LumpType::Models,
            &[BspModel {
                mesh_start: 0,
                mesh_count: 1,
                ..BspModel::zeroed()
            }],
        )
        .records(
            LumpType::Meshes,
            &[BspMesh {
                face_start: 0,
                face_count: 2,
                material_index: 0,
                flags: 0,
                ..BspMesh::zeroed()
            }],
        )
        .records(LumpType::Materials, &[BspMaterial::zeroed()])
        .records(LumpType::Textures, &[BspTexture::zeroed()])
        .lump(LumpType::SurfaceNames, names)
        .records(LumpType::Faces, &[0u16, 1, 2, 0, 2, 3])
        .records(LumpType::Vertices, &positions)
        .records(LumpType::Normals, &[vec3(0.0, 0.0, 1.0)])
        .records(LumpType::VertexLitFlat, &vertices)
}

#[derive(Copy, Clone, Debug)]
pub struct PropRecord {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
    pub name_index: u16,
}

impl Default for PropRecord {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            name_index: 0,
        }
    }
}

/// A static prop game lump with the given model names and placements.
pub fn prop_lump(names: &[&str], props: &[PropRecord]) -> Vec<u8> {
    let header = StaticPropHeader {
        version: 1,
        magic: 0x7370_7270,
        flags: 0,
        hash: 0,
        name_count: names.len() as u32,
    };

    let mut bytes = bytemuck::bytes_of(&header).to_vec();
    for name in names {
        let mut slot = [0u8; PROP_NAME_LENGTH];
        slot[..name.len()].copy_from_slice(name.as_bytes());
        bytes.extend_from_slice(&slot);
    }
    bytes.extend_from_slice(&(props.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&[0; 8]);

    for prop in props {
        let record = StaticPropLump {
            position: prop.position,
            rotation: prop.rotation,
            scale: prop.scale,
            name_index: prop.name_index,
            ..StaticPropLump::zeroed()
        };
        bytes.extend_from_slice(bytemuck::bytes_of(&record));
    }
    bytes
}
