use flagset::flags;
use num_derive::FromPrimitive;

/// "rBSP" read as a little endian u32.
pub const RBSP_MAGIC: u32 = 0x5053_4272;
/// Titanfall 2 and Apex Legends era levels.
pub const RBSP_VERSIONS: [u16; 2] = [0x31, 0x32];

/// Fixed width of a static prop model name slot.
pub const PROP_NAME_LENGTH: usize = 0x80;
/// Bytes between the prop count and the first prop record.
pub const PROP_RESERVED_BYTES: i64 = 0x8;

/// "mprt" placement file written next to an exported level.
pub const MPRT_MAGIC: u32 = 0x7472_706D;
pub const MPRT_VERSION: u32 = 0x3;

/// Identity given to materials that could not be found in the registry.
pub const PLACEHOLDER_MATERIAL_HASH: u64 = 0xDEAD_BEEF;
/// Folder, relative to the exported model, that extracted textures go in.
pub const TEXTURE_SUBFOLDER: &str = "_images";

#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LumpType {
    Textures = 0x02,
    Vertices = 0x03,
    Models = 0x0E,
    SurfaceNames = 0x0F,
    Normals = 0x1E,
    GameLump = 0x23,
    VertexUnlit = 0x47,
    VertexLitFlat = 0x48,
    VertexLitBump = 0x49,
    VertexUnlitTs = 0x4A,
    Faces = 0x4F,
    Meshes = 0x50,
    Materials = 0x52,
}

impl LumpType {
    pub fn id(self) -> u32 {
        self as u32
    }
}

flags! {
    /// Mesh flag bits that pick the vertex lump a mesh indexes into.
    pub enum MeshFlags: u32 {
        VertexBump = 0x200,
        VertexUnlit = 0x400,
    }
}

