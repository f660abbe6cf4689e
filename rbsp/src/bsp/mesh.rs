use std::ops::Range;

use flagset::FlagSet;

use super::{
    consts::{LumpType, MeshFlags},
    vertex::VertexLayout,
    Lump,
};

/// A run of triangles sharing one material.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BspMesh {
    pub face_start: u32, // index into the faces lump
    pub face_count: u16, // triangles, three faces entries each
    pub unknown1: u16,
    pub unknowns: [u32; 3],
    pub unknown2: u16,
    pub material_index: u16,
    pub flags: u32,
}

impl BspMesh {
    pub fn flags(&self) -> FlagSet<MeshFlags> {
        FlagSet::new_truncated(self.flags)
    }

    pub fn vertex_layout(&self) -> VertexLayout {
        VertexLayout::from_mesh_flags(self.flags)
    }

    /// Range of the faces lump holding this mesh's triangle indices.
    pub fn face_range(&self) -> Range<usize> {
        let start = self.face_start as usize;
        start..start + self.face_count as usize * 3
    }
}

impl Lump for BspMesh {
    fn lump_type() -> LumpType {
        LumpType::Meshes
    }
}
