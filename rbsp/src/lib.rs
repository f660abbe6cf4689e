//! Reader for Respawn `rBSP` level files.
//!
//! A level is a header and a directory of lumps. Lump payloads either follow
//! the directory in the same file or, for "entirely streamed" levels, live in
//! `<map>.bsp.<id>.bsp_lump` sidecar files next to it. [`bsp::BspLevel`]
//! decodes the lumps needed to rebuild world geometry, [`meshes::build_model`]
//! turns them into a renderer agnostic [`scene::Model`] and
//! [`bsp::gamelump`] decodes the static prop placements.

pub mod binaries;
pub mod bsp;
pub mod config;
pub mod error;
pub mod export;
pub mod materials;
pub mod meshes;
pub mod prelude;
pub mod scene;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{BspError, BspResult};
