use super::{consts::LumpType, Lump};
use crate::{
    binaries::c_string,
    error::{BspError, BspResult},
};

/// Materials tie a mesh to a texture, and give the base every faces entry of
/// the mesh is offset by before it indexes the vertex lump. Meshes sharing a
/// material share one partition of that vertex lump.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BspMaterial {
    pub texture_index: u16,
    pub lightmap_index: u16,
    pub unknowns: [u16; 2],
    pub vertex_offset: u32,
}

impl Lump for BspMaterial {
    fn lump_type() -> LumpType {
        LumpType::Materials
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BspTexture {
    pub name_index: u32, // byte offset into the surface names lump
    pub width: u32,
    pub height: u32,
    pub flags: u32,
}

impl Lump for BspTexture {
    fn lump_type() -> LumpType {
        LumpType::Textures
    }
}

/// The surface names lump: null terminated strings addressed by byte offset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameTable(pub Vec<u8>);

impl NameTable {
    pub fn name_at(&self, offset: usize) -> BspResult<String> {
        let Some(bytes) = self.0.get(offset..) else {
            return Err(BspError::IndexOutOfRange {
                what: "surface name offset",
                index: offset,
                len: self.0.len(),
            });
        };
        Ok(c_string(bytes))
    }
}

/// `world/dev/Generic_01.vmt` -> `Generic_01`
pub fn file_stem(name: &str) -> &str {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);

    match file.rfind('.') {
        Some(ext) => &file[..ext],
        None => file,
    }
}

/// Key used to match surface names against registry material names.
pub fn normalize_name(name: &str) -> String {
    file_stem(name).to_ascii_lowercase()
}
