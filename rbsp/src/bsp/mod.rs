//! Lump level reading of rBSP files.

pub mod consts;
pub mod gamelump;
pub mod header;
pub mod level;
pub mod lump;
pub mod mesh;
pub mod model;
pub mod textures;
pub mod vertex;

pub use consts::LumpType;
pub use level::BspLevel;
pub use lump::{BspFile, Lump};
