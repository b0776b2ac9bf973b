use std::{
  fs, io,
  path::{Path, PathBuf},
};

use oxc_resolver::{FileMetadata, FileSystem as OxcResolverFileSystem};

use crate::FileSystem;

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    fs::write(path, content)
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }
}

impl OxcResolverFileSystem for OsFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
  }

  fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    let metadata = fs::metadata(path)?;
    Ok(FileMetadata::new(metadata.is_file(), metadata.is_dir(), false))
  }

  fn symlink_metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    let metadata = fs::symlink_metadata(path)?;
    Ok(FileMetadata::new(metadata.is_file(), metadata.is_dir(), metadata.is_symlink()))
  }

  fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    fs::read_link(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn writes_and_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let fs = OsFileSystem;
    let out = dir.path().join("dist");
    fs.create_dir_all(&out).unwrap();
    fs.write(&out.join("main.js"), b"console.log(1)").unwrap();

    assert!(fs.is_dir(&out));
    assert!(fs.is_file(&out.join("main.js")));
    assert_eq!(fs.read_to_string(&out.join("main.js")).unwrap(), "console.log(1)");
    assert!(!fs.is_file(&out.join("missing.js")));
    assert!(fs.metadata(&out.join("missing.js")).is_err());
  }
}
