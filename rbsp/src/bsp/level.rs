use glam::Vec3;

use super::{
    consts::LumpType,
    lump::BspFile,
    mesh::BspMesh,
    model::BspModel,
    textures::{BspMaterial, BspTexture, NameTable},
    vertex::VertexLumps,
};
use crate::error::{get_indexed, BspError, BspResult};

/// Every lump needed to rebuild the world geometry and static props of a
/// level, decoded up front.
#[derive(Clone, Debug, Default)]
pub struct BspLevel {
    pub models: Vec<BspModel>,
    pub meshes: Vec<BspMesh>,
    pub materials: Vec<BspMaterial>,
    pub textures: Vec<BspTexture>,
    pub names: NameTable,
    pub faces: Vec<u16>,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub vertex_lumps: VertexLumps,
    pub game_lump: Vec<u8>,
}

impl BspLevel {
    pub fn load(file: &mut BspFile) -> BspResult<Self> {
        let level = Self {
            models: file.get_lump()?,
            meshes: file.get_lump()?,
            materials: file.get_lump()?,
            textures: file.get_lump()?,
            names: NameTable(file.read_bytes(LumpType::SurfaceNames)?),
            faces: file.get_lump_as(LumpType::Faces)?,
            vertices: file.get_lump_as(LumpType::Vertices)?,
            normals: file.get_lump_as(LumpType::Normals)?,
            vertex_lumps: VertexLumps::load(file)?,
            game_lump: file.read_bytes(LumpType::GameLump)?,
        };

        log::debug!(
            "Loaded {} models, {} meshes, {} materials, {} positions",
            level.models.len(),
            level.meshes.len(),
            level.materials.len(),
            level.vertices.len()
        );

        Ok(level)
    }

    pub fn mesh(&self, index: usize) -> BspResult<&BspMesh> {
        get_indexed(&self.meshes, index, "mesh")
    }

    pub fn material(&self, index: usize) -> BspResult<&BspMaterial> {
        get_indexed(&self.materials, index, "material")
    }

    pub fn texture(&self, index: usize) -> BspResult<&BspTexture> {
        get_indexed(&self.textures, index, "texture")
    }

    /// Name of the texture a mesh's material points at.
    pub fn texture_name(&self, mesh: &BspMesh) -> BspResult<String> {
        let material = self.material(mesh.material_index as usize)?;
        let texture = self.texture(material.texture_index as usize)?;
        self.names.name_at(texture.name_index as usize)
    }

    pub fn faces_for(&self, mesh: &BspMesh) -> BspResult<&[u16]> {
        let range = mesh.face_range();
        match self.faces.get(range.clone()) {
            Some(faces) => Ok(faces),
            None => Err(BspError::IndexOutOfRange {
                what: "faces",
                index: range.end.saturating_sub(1),
                len: self.faces.len(),
            }),
        }
    }

    pub fn position(&self, index: usize) -> BspResult<Vec3> {
        get_indexed(&self.vertices, index, "vertex position").copied()
    }

    pub fn normal(&self, index: usize) -> BspResult<Vec3> {
        get_indexed(&self.normals, index, "vertex normal").copied()
    }
}
