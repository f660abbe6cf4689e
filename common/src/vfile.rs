use std::{
    fs,
    io::{self, BufReader, Cursor, Read},
    path::{Path, PathBuf},
    sync::Arc,
};

use std::collections::HashMap;

/// Anything that can hand out whole files by path.
///
/// `Ok(None)` means the file does not exist, which callers are free to
/// treat as a soft failure. Any other problem reading the file is an error.
pub trait FileSource: Send + Sync {
    fn read_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;
}

/// Files on the local disk.
#[derive(Default, Clone, Copy, Debug)]
pub struct DiskFiles;

impl FileSource for DiskFiles {
    fn read_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct VFile {
    pub data: Vec<u8>,
}

/// In-memory file system, cheap to clone and share between readers.
#[derive(Default, Clone, Debug)]
pub struct VFileSystem {
    pub files: Arc<HashMap<PathBuf, VFile>>,
}

impl VFileSystem {
    pub fn insert(&mut self, path: impl Into<PathBuf>, data: Vec<u8>) {
        Arc::make_mut(&mut self.files).insert(path.into(), VFile { data });
    }

    pub fn get(&self, path: &Path) -> Option<BufReader<Cursor<&[u8]>>> {
        match self.files.get(path) {
            Some(file) => {
                let c = Cursor::new(&file.data[..]);

                Some(BufReader::new(c))
            }
            None => {
                log::debug!("{:?} file not found", path);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSource for VFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        let Some(mut reader) = self.get(path) else {
            return Ok(None);
        };
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Some(data))
    }
}
