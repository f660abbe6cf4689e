use std::{
    ffi::OsString,
    fs::File,
    io::{self, BufReader, Read, Seek},
    path::{Path, PathBuf},
    sync::Arc,
};

use bytemuck::Pod;
use common::vfile::{DiskFiles, FileSource};
use num_traits::FromPrimitive;

use super::{consts::LumpType, header::BspHeader};
use crate::{
    binaries::records_from_bytes,
    error::{BspError, BspResult},
};

/// Fixed size records that make up a lump.
pub trait Lump: Pod {
    fn lump_type() -> LumpType;
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BspLump {
    pub offset: u32,            // offset into file (bytes)
    pub data_size: u32,         // length of lump (bytes)
    pub version: u32,           // lump format version
    pub uncompressed_size: u32, // 0 unless the lump is compressed
}

/// Where lump payloads come from. Picked once per file from the header's
/// streamed flag.
pub trait LumpSource: Send {
    fn read_lump(&mut self, lump: LumpType, entry: &BspLump) -> BspResult<Vec<u8>>;
}

/// Payloads stored inline, after the directory.
pub struct StreamLumps<R> {
    reader: R,
}

impl<R: Read + Seek + Send> StreamLumps<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read + Seek + Send> LumpSource for StreamLumps<R> {
    fn read_lump(&mut self, lump: LumpType, entry: &BspLump) -> BspResult<Vec<u8>> {
        let expected = entry.data_size as usize;

        self.reader.seek(io::SeekFrom::Start(entry.offset as u64))?;

        let mut bytes = Vec::new();
        (&mut self.reader)
            .take(expected as u64)
            .read_to_end(&mut bytes)?;

        if bytes.len() != expected {
            return Err(BspError::LumpTruncated {
                lump: lump.id(),
                expected,
                actual: bytes.len(),
            });
        }
        Ok(bytes)
    }
}

/// Payloads stored in `<base>.bsp.<id>.bsp_lump` files next to the level.
pub struct SidecarLumps {
    base_path: PathBuf,
    files: Arc<dyn FileSource>,
}

impl SidecarLumps {
    pub fn new(base_path: PathBuf, files: Arc<dyn FileSource>) -> Self {
        Self { base_path, files }
    }

    pub fn lump_path(&self, lump: LumpType) -> PathBuf {
        sidecar_path(&self.base_path, lump)
    }
}

impl LumpSource for SidecarLumps {
    fn read_lump(&mut self, lump: LumpType, entry: &BspLump) -> BspResult<Vec<u8>> {
        let size = entry.data_size as usize;
        let path = self.lump_path(lump);

        let mut bytes = vec![0; size];
        match self.files.read_file(&path)? {
            Some(data) => {
                let len = data.len().min(size);
                bytes[..len].copy_from_slice(&data[..len]);
                if data.len() < size {
                    log::warn!(
                        "{:?} holds {} of {} bytes, zero filling the rest",
                        path,
                        data.len(),
                        size
                    );
                }
            }
            None => {
                log::warn!("Missing external lump {:?}, leaving {size} bytes zeroed", path);
            }
        }
        Ok(bytes)
    }
}

/// `maps/mp_rr_box.bsp` -> `maps/mp_rr_box`
pub fn sidecar_base(asset: &Path) -> PathBuf {
    asset.with_extension("")
}

/// `maps/mp_rr_box` + [`LumpType::Meshes`] -> `maps/mp_rr_box.bsp.0050.bsp_lump`
pub fn sidecar_path(base_path: &Path, lump: LumpType) -> PathBuf {
    let mut path = OsString::from(base_path.as_os_str());
    path.push(format!(".bsp.{:04x}.bsp_lump", lump.id()));
    PathBuf::from(path)
}

/// An opened level: validated header, lump directory and the payload source.
pub struct BspFile {
    header: BspHeader,
    lumps: Vec<BspLump>,
    source: Box<dyn LumpSource>,
}

impl BspFile {
    pub fn open(path: &Path) -> BspResult<Self> {
        Self::open_with(path, Arc::new(DiskFiles))
    }

    /// Opens a level, looking up sidecar lumps through `files`.
    pub fn open_with(path: &Path, files: Arc<dyn FileSource>) -> BspResult<Self> {
        let file = File::open(path)?;
        let buffer = BufReader::new(file);

        Self::from_reader(buffer, sidecar_base(path), files)
    }

    pub fn from_reader<R: Read + Seek + Send + 'static>(
        mut buffer: R,
        base_path: PathBuf,
        files: Arc<dyn FileSource>,
    ) -> BspResult<Self> {
        let header = BspHeader::read_checked(&mut buffer)?;

        let lumps = read_directory(&mut buffer, header.lump_count())?;

        let source: Box<dyn LumpSource> = if header.is_streamed() {
            Box::new(SidecarLumps::new(base_path, files))
        } else {
            Box::new(StreamLumps::new(buffer))
        };

        log::debug!("{header:?}");

        Ok(Self {
            header,
            lumps,
            source,
        })
    }

    pub fn header(&self) -> &BspHeader {
        &self.header
    }

    pub fn lumps(&self) -> &[BspLump] {
        &self.lumps
    }

    pub fn lump_header(&self, lump: LumpType) -> BspResult<&BspLump> {
        self.lumps
            .get(lump.id() as usize)
            .ok_or(BspError::LumpOutsideDirectory {
                lump: lump.id(),
                count: self.lumps.len(),
            })
    }

    pub fn read_bytes(&mut self, lump: LumpType) -> BspResult<Vec<u8>> {
        let entry = *self.lump_header(lump)?;
        self.source.read_lump(lump, &entry)
    }

    pub fn get_lump<T: Lump>(&mut self) -> BspResult<Vec<T>> {
        self.get_lump_as(T::lump_type())
    }

    /// Decodes `lump` as an array of `T`, for lumps whose element type is
    /// shared with another lump.
    pub fn get_lump_as<T: Pod>(&mut self, lump: LumpType) -> BspResult<Vec<T>> {
        let bytes = self.read_bytes(lump)?;
        Ok(records_from_bytes(&bytes))
    }

    /// Logs every directory entry this crate knows the meaning of.
    pub fn describe(&self) {
        log::info!("{:?}", self.header);
        for (i, entry) in self.lumps.iter().enumerate() {
            if let Some(lump) = LumpType::from_usize(i) {
                log::info!("{:?} ({:#06x}) {:?}", lump, i, entry);
            }
        }
    }
}

fn read_directory<R: Read>(buffer: &mut R, count: usize) -> BspResult<Vec<BspLump>> {
    let expected = count * std::mem::size_of::<BspLump>();

    let mut bytes = Vec::new();
    buffer.take(expected as u64).read_to_end(&mut bytes)?;

    if bytes.len() != expected {
        return Err(BspError::Truncated {
            what: "lump directory",
        });
    }
    Ok(records_from_bytes(&bytes))
}
