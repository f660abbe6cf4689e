use std::{io, path::PathBuf};

use thiserror::Error;

use crate::export::ModelExportFormat;

#[derive(Error, Debug)]
pub enum BspError {
    #[error("not an rBSP file (magic {magic:#010x})")]
    BadMagic { magic: u32 },
    #[error("unsupported rBSP version {version:#x}")]
    UnsupportedVersion { version: u16 },
    #[error("corrupt asset: lump {lump:#06x} is outside the {count} entry lump directory")]
    LumpOutsideDirectory { lump: u32, count: usize },
    #[error("corrupt asset: lump {lump:#06x} is truncated ({actual} of {expected} bytes)")]
    LumpTruncated {
        lump: u32,
        expected: usize,
        actual: usize,
    },
    #[error("corrupt asset: {what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("corrupt asset: {what} is truncated")]
    Truncated { what: &'static str },
    #[error("no scene exporter registered for {0:?}")]
    NoExporter(ModelExportFormat),
    #[error("scene export to {path:?} failed")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid export config: {reason}")]
    Config { reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl BspError {
    /// The input is not a level this crate reads, as opposed to a damaged one.
    pub fn is_format_rejection(&self) -> bool {
        matches!(
            self,
            BspError::BadMagic { .. } | BspError::UnsupportedVersion { .. }
        )
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            BspError::LumpOutsideDirectory { .. }
                | BspError::LumpTruncated { .. }
                | BspError::IndexOutOfRange { .. }
                | BspError::Truncated { .. }
        )
    }
}

pub type BspResult<T> = Result<T, BspError>;

/// Looks up `index` in `table`, reporting a corrupt asset instead of panicking.
pub(crate) fn get_indexed<'a, T>(table: &'a [T], index: usize, what: &'static str) -> BspResult<&'a T> {
    table.get(index).ok_or(BspError::IndexOutOfRange {
        what,
        index,
        len: table.len(),
    })
}
