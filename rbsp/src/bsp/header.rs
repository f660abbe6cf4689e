use std::{fmt, io::Read, mem};

use super::consts::{RBSP_MAGIC, RBSP_VERSIONS};
use crate::error::{BspError, BspResult};

#[repr(C)]
#[derive(Copy, Clone, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BspHeader {
    pub magic: u32,                // rBSP file identifier
    pub version: u16,              // rBSP file version
    pub is_entirely_streamed: u16, // non zero when every lump lives in a sidecar file
    pub revision: u32,             // the map's revision (iteration, version) number
    pub num_lumps_minus_one: u32,  // lump directory length - 1
}

impl fmt::Debug for BspHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BspHeader")
            .field("magic", &format_args!("{:#010x}", self.magic))
            .field("version", &format_args!("{:#x}", self.version))
            .field("streamed", &self.is_streamed())
            .field("revision", &self.revision)
            .field("lumps", &self.lump_count())
            .finish()
    }
}

impl BspHeader {
    pub fn lump_count(&self) -> usize {
        self.num_lumps_minus_one as usize + 1
    }

    pub fn is_streamed(&self) -> bool {
        self.is_entirely_streamed != 0
    }

    /// Reads and validates the header. The magic is checked first: a short
    /// file of another format is a rejection, not a truncated rBSP.
    pub fn read_checked<R: Read>(buffer: &mut R) -> BspResult<Self> {
        let size = mem::size_of::<Self>() as u64;
        let mut bytes = Vec::with_capacity(size as usize);
        buffer.take(size).read_to_end(&mut bytes)?;

        let magic = RBSP_MAGIC.to_le_bytes();
        let present = bytes.len().min(magic.len());
        if bytes[..present] != magic[..present] {
            let mut found = [0; 4];
            found[..present].copy_from_slice(&bytes[..present]);
            return Err(BspError::BadMagic {
                magic: u32::from_le_bytes(found),
            });
        }
        if bytes.len() < size as usize {
            return Err(BspError::Truncated { what: "header" });
        }

        let header: Self = bytemuck::pod_read_unaligned(&bytes);
        header.validate()?;
        Ok(header)
    }

    /// Rejects anything that is not an rBSP of a version we understand.
    pub fn validate(&self) -> BspResult<()> {
        if self.magic != RBSP_MAGIC {
            return Err(BspError::BadMagic { magic: self.magic });
        }
        if !RBSP_VERSIONS.contains(&self.version) {
            return Err(BspError::UnsupportedVersion {
                version: self.version,
            });
        }
        Ok(())
    }
}
