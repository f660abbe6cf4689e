use std::ops::Range;

use glam::Vec3;

use super::{consts::LumpType, Lump};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BspModel {
    pub mins: Vec3,
    pub maxs: Vec3,
    pub mesh_start: u32,
    pub mesh_count: u32,
    pub unknowns: [u32; 8],
}

impl BspModel {
    /// Indices of the meshes this model owns.
    pub fn mesh_range(&self) -> Range<usize> {
        let start = self.mesh_start as usize;
        start..start + self.mesh_count as usize
    }
}

impl Lump for BspModel {
    fn lump_type() -> LumpType {
        LumpType::Models
    }
}
