use std::{
    io::{self, Cursor, Seek, SeekFrom, Write},
    mem,
};

use fixedstr::zstr;
use glam::{vec3, Vec3};

use super::{
    consts::{MPRT_MAGIC, MPRT_VERSION, PROP_NAME_LENGTH, PROP_RESERVED_BYTES},
    textures::file_stem,
};
use crate::{
    binaries::BinaryData,
    error::{get_indexed, BspError, BspResult},
};

// The game lump of an rBSP is a static prop container:
//
//   header
//   name_count * [u8; 0x80]   model names, null padded
//   u32                       prop count
//   8 reserved bytes
//   prop_count * prop record

#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StaticPropHeader {
    pub version: u32,
    pub magic: u32,
    pub flags: u32,
    pub hash: u64,
    pub name_count: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StaticPropLump {
    pub position: Vec3,
    pub rotation: Vec3, // stored x, y, z
    pub scale: f32,
    pub name_index: u16,
    pub reserved: [u8; 2],
    pub padding: [u8; 32],
}

/// A placed static prop, ready to be written out.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticProp {
    pub name: String,
    pub position: Vec3,
    /// Already reordered to z, x, y.
    pub rotation: Vec3,
    pub scale: f32,
}

#[derive(Clone, Debug, Default)]
pub struct StaticPropContainer {
    pub header: Option<StaticPropHeader>,
    pub names: Vec<String>,
    pub props: Vec<StaticProp>,
}

pub fn load_static_props(data: &[u8]) -> BspResult<StaticPropContainer> {
    if data.is_empty() {
        log::debug!("Empty game lump, no static props");
        return Ok(StaticPropContainer::default());
    }

    let mut buffer = Cursor::new(data);

    let header = StaticPropHeader::read(&mut buffer).map_err(truncated("static prop header"))?;
    let name_count = header.name_count as usize;

    ensure_remaining(&buffer, name_count * PROP_NAME_LENGTH, "static prop names")?;

    let mut names = Vec::with_capacity(name_count);
    for _i in 0..name_count {
        let slot = <[u8; PROP_NAME_LENGTH]>::read(&mut buffer)
            .map_err(truncated("static prop names"))?;
        let name = zstr::<PROP_NAME_LENGTH>::from_raw(&slot);
        names.push(String::from_utf8_lossy(&name.as_bytes()[..name.len()]).into_owned());
    }

    let prop_count = u32::read(&mut buffer).map_err(truncated("static prop count"))? as usize;
    buffer.seek(SeekFrom::Current(PROP_RESERVED_BYTES))?;

    ensure_remaining(
        &buffer,
        prop_count * mem::size_of::<StaticPropLump>(),
        "static props",
    )?;
    let records = StaticPropLump::read_array(&mut buffer, prop_count)
        .map_err(truncated("static props"))?;

    let mut props = Vec::with_capacity(prop_count);
    for record in records {
        let name = get_indexed(&names, record.name_index as usize, "static prop name")?;
        let rotation = record.rotation;

        props.push(StaticProp {
            name: file_stem(name).to_owned(),
            position: record.position,
            rotation: vec3(rotation.z, rotation.x, rotation.y),
            scale: record.scale,
        });
    }

    log::debug!("Loaded {} static props using {} models", props.len(), names.len());

    Ok(StaticPropContainer {
        header: Some(header),
        names,
        props,
    })
}

impl StaticPropContainer {
    /// Writes the `.mprt` placement listing. All values little endian, no
    /// padding between fields.
    pub fn write_mprt<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&MPRT_MAGIC.to_le_bytes())?;
        out.write_all(&MPRT_VERSION.to_le_bytes())?;
        out.write_all(&(self.props.len() as u32).to_le_bytes())?;

        for prop in &self.props {
            out.write_all(prop.name.as_bytes())?;
            out.write_all(&[0])?;

            for v in prop.position.to_array() {
                out.write_all(&v.to_le_bytes())?;
            }
            for v in prop.rotation.to_array() {
                out.write_all(&v.to_le_bytes())?;
            }
            out.write_all(&prop.scale.to_le_bytes())?;
        }
        Ok(())
    }
}

fn truncated(what: &'static str) -> impl Fn(io::Error) -> BspError {
    move |e| match e.kind() {
        io::ErrorKind::UnexpectedEof => BspError::Truncated { what },
        _ => BspError::Io(e),
    }
}

fn ensure_remaining(buffer: &Cursor<&[u8]>, needed: usize, what: &'static str) -> BspResult<()> {
    let remaining = (buffer.get_ref().len() as u64).saturating_sub(buffer.position());
    if (remaining as usize) < needed {
        return Err(BspError::Truncated { what });
    }
    Ok(())
}
