//! Renderer agnostic scene handed to model exporters.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaterialSlot {
    Albedo,
    Normal,
    Gloss,
    Specular,
    Emissive,
    AmbientOcclusion,
    Cavity,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexColor(pub [u8; 4]);

impl Default for VertexColor {
    fn default() -> Self {
        Self([255; 4])
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: VertexColor,
    pub uv: Vec2,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[u32; 3]>,
    pub material_index: usize,
}

impl Mesh {
    pub fn push_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    /// Adds a triangle over the last three vertices pushed.
    pub fn push_tri(&mut self) {
        let n = self.vertices.len() as u32;
        debug_assert!(n >= 3);
        self.faces.push([n - 3, n - 2, n - 1]);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    pub hash: u64,
    /// Texture paths relative to the exported model.
    pub slots: BTreeMap<MaterialSlot, String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a material with no texture slots, returning its index.
    pub fn add_material(&mut self, name: impl Into<String>, hash: u64) -> usize {
        self.materials.push(Material {
            name: name.into(),
            hash,
            slots: BTreeMap::new(),
        });
        self.materials.len() - 1
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(|m| m.faces.len()).sum()
    }
}
