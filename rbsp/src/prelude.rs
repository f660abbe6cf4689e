pub use crate::bsp::{
    consts::{LumpType, MeshFlags},
    gamelump::{load_static_props, StaticProp, StaticPropContainer},
    header::BspHeader,
    lump::{BspFile, BspLump, Lump},
    mesh::BspMesh,
    model::BspModel,
    textures::{BspMaterial, BspTexture, NameTable},
    vertex::{VertexLayout, VertexLumps, VertexRecord},
    BspLevel,
};
pub use crate::config::ExportConfig;
pub use crate::error::{BspError, BspResult};
pub use crate::export::{
    export_batch, export_bsp, ExportSummary, Exporters, ModelExportFormat, SceneExporter,
};
pub use crate::materials::{MaterialBinder, MaterialRegistry, MaterialTable};
pub use crate::meshes::build_model;
pub use crate::scene::{Material, MaterialSlot, Mesh, Model, Vertex};
