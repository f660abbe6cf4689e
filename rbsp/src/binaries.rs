use std::{
    io::{self, Read},
    mem,
};

use bytemuck::Pod;

/// Fixed layout records that can be read straight out of a byte stream.
///
/// All rBSP data is little endian, as is every platform the tools run on, so
/// records are read as raw bytes with no swapping.
pub trait BinaryData: Pod {
    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        let mut value = Self::zeroed();
        buffer.read_exact(bytemuck::bytes_of_mut(&mut value))?;
        Ok(value)
    }

    fn read_array<R: Read>(buffer: &mut R, count: usize) -> io::Result<Vec<Self>> {
        let mut table = vec![Self::zeroed(); count];
        buffer.read_exact(bytemuck::cast_slice_mut(&mut table))?;
        Ok(table)
    }
}

impl<T: Pod> BinaryData for T {}

/// Reinterprets as many whole records as fit in `bytes`. Trailing bytes that
/// do not make up a full record are ignored.
pub fn records_from_bytes<T: Pod>(bytes: &[u8]) -> Vec<T> {
    let item_size = mem::size_of::<T>();
    let len = bytes.len() / item_size;

    bytemuck::pod_collect_to_vec(&bytes[..len * item_size])
}

/// Reads bytes up to the first null, or the whole slice if there is none.
pub fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
