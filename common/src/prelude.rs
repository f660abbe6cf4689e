pub use crate::vfile::{DiskFiles, FileSource, VFile, VFileSystem};
