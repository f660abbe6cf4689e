use flagset::FlagSet;
use glam::Vec2;

use super::{
    consts::{LumpType, MeshFlags},
    lump::BspFile,
    Lump,
};
use crate::error::{get_indexed, BspResult};

// Every mesh indexes exactly one of the four vertex lumps, picked by its
// flags. All four start with indices into the shared position and normal
// lumps followed by the texture coordinates.

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexLitFlat {
    pub position_index: u32,
    pub normal_index: u32,
    pub uv: Vec2,
    pub unknown: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexLitBump {
    pub position_index: u32,
    pub normal_index: u32,
    pub uv: Vec2,
    pub negative_one: u32,
    pub lightmap_uv: Vec2,
    pub rgba: [u8; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexUnlit {
    pub position_index: u32,
    pub normal_index: u32,
    pub uv: Vec2,
    pub unknown: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexUnlitTs {
    pub position_index: u32,
    pub normal_index: u32,
    pub uv: Vec2,
    pub unknown: u32,
    pub unknown2: u32,
}

impl Lump for VertexLitFlat {
    fn lump_type() -> LumpType {
        LumpType::VertexLitFlat
    }
}
impl Lump for VertexLitBump {
    fn lump_type() -> LumpType {
        LumpType::VertexLitBump
    }
}
impl Lump for VertexUnlit {
    fn lump_type() -> LumpType {
        LumpType::VertexUnlit
    }
}
impl Lump for VertexUnlitTs {
    fn lump_type() -> LumpType {
        LumpType::VertexUnlitTs
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    LitFlat,
    LitBump,
    Unlit,
    UnlitTs,
}

impl VertexLayout {
    pub fn from_mesh_flags(flags: u32) -> Self {
        let flags: FlagSet<MeshFlags> = FlagSet::new_truncated(flags);

        match (
            flags.contains(MeshFlags::VertexUnlit),
            flags.contains(MeshFlags::VertexBump),
        ) {
            (false, false) => VertexLayout::LitFlat,
            (false, true) => VertexLayout::LitBump,
            (true, false) => VertexLayout::Unlit,
            (true, true) => VertexLayout::UnlitTs,
        }
    }

    pub fn lump_type(self) -> LumpType {
        match self {
            VertexLayout::LitFlat => LumpType::VertexLitFlat,
            VertexLayout::LitBump => LumpType::VertexLitBump,
            VertexLayout::Unlit => LumpType::VertexUnlit,
            VertexLayout::UnlitTs => LumpType::VertexUnlitTs,
        }
    }
}

/// One vertex record out of whichever lump the owning mesh uses.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VertexRecord {
    LitFlat(VertexLitFlat),
    LitBump(VertexLitBump),
    Unlit(VertexUnlit),
    UnlitTs(VertexUnlitTs),
}

impl VertexRecord {
    pub fn layout(&self) -> VertexLayout {
        match self {
            VertexRecord::LitFlat(_) => VertexLayout::LitFlat,
            VertexRecord::LitBump(_) => VertexLayout::LitBump,
            VertexRecord::Unlit(_) => VertexLayout::Unlit,
            VertexRecord::UnlitTs(_) => VertexLayout::UnlitTs,
        }
    }

    pub fn position_index(&self) -> usize {
        let index = match self {
            VertexRecord::LitFlat(v) => v.position_index,
            VertexRecord::LitBump(v) => v.position_index,
            VertexRecord::Unlit(v) => v.position_index,
            VertexRecord::UnlitTs(v) => v.position_index,
        };
        index as usize
    }

    pub fn normal_index(&self) -> usize {
        let index = match self {
            VertexRecord::LitFlat(v) => v.normal_index,
            VertexRecord::LitBump(v) => v.normal_index,
            VertexRecord::Unlit(v) => v.normal_index,
            VertexRecord::UnlitTs(v) => v.normal_index,
        };
        index as usize
    }

    pub fn uv(&self) -> Vec2 {
        match self {
            VertexRecord::LitFlat(v) => v.uv,
            VertexRecord::LitBump(v) => v.uv,
            VertexRecord::Unlit(v) => v.uv,
            VertexRecord::UnlitTs(v) => v.uv,
        }
    }
}

/// The four vertex lumps of a level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexLumps {
    pub lit_flat: Vec<VertexLitFlat>,
    pub lit_bump: Vec<VertexLitBump>,
    pub unlit: Vec<VertexUnlit>,
    pub unlit_ts: Vec<VertexUnlitTs>,
}

impl VertexLumps {
    pub fn load(file: &mut BspFile) -> BspResult<Self> {
        Ok(Self {
            lit_bump: file.get_lump()?,
            lit_flat: file.get_lump()?,
            unlit: file.get_lump()?,
            unlit_ts: file.get_lump()?,
        })
    }

    /// `index` is the raw faces entry plus the material's vertex offset.
    pub fn resolve(&self, layout: VertexLayout, index: usize) -> BspResult<VertexRecord> {
        Ok(match layout {
            VertexLayout::LitFlat => {
                VertexRecord::LitFlat(*get_indexed(&self.lit_flat, index, "lit flat vertex")?)
            }
            VertexLayout::LitBump => {
                VertexRecord::LitBump(*get_indexed(&self.lit_bump, index, "lit bump vertex")?)
            }
            VertexLayout::Unlit => {
                VertexRecord::Unlit(*get_indexed(&self.unlit, index, "unlit vertex")?)
            }
            VertexLayout::UnlitTs => {
                VertexRecord::UnlitTs(*get_indexed(&self.unlit_ts, index, "unlit ts vertex")?)
            }
        })
    }

    pub fn len(&self, layout: VertexLayout) -> usize {
        match layout {
            VertexLayout::LitFlat => self.lit_flat.len(),
            VertexLayout::LitBump => self.lit_bump.len(),
            VertexLayout::Unlit => self.unlit.len(),
            VertexLayout::UnlitTs => self.unlit_ts.len(),
        }
    }
}
