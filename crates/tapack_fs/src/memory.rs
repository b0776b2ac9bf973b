use std::{
  io::{self, Read, Write},
  path::{Path, PathBuf},
};

use oxc_resolver::{FileMetadata, FileSystem as OxcResolverFileSystem};
use sugar_path::SugarPath;
use vfs::{MemoryFS, VfsFileType, VfsPath};

use crate::FileSystem;

/// In-memory file system. Paths are absolute and mapped onto the root of a vfs `MemoryFS`.
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
  root: VfsPath,
}

impl Default for MemoryFileSystem {
  fn default() -> Self {
    Self { root: VfsPath::new(MemoryFS::new()) }
  }
}

impl MemoryFileSystem {
  /// Creates a file system seeded with `files`, creating parent directories as needed.
  pub fn new<P: AsRef<Path>, C: AsRef<[u8]>>(
    files: impl IntoIterator<Item = (P, C)>,
  ) -> io::Result<Self> {
    let fs = Self::default();
    for (path, content) in files {
      let path = path.as_ref();
      if let Some(parent) = path.parent() {
        fs.create_dir_all(parent)?;
      }
      fs.write(path, content.as_ref())?;
    }
    Ok(fs)
  }

  fn vfs_path(&self, path: &Path) -> io::Result<VfsPath> {
    let normalized = path.normalize();
    let slash = normalized.to_slash_lossy();
    let relative = slash.trim_start_matches('/').trim_end_matches('/');
    if relative.is_empty() || relative == "." {
      return Ok(self.root.clone());
    }
    self.root.join(relative).map_err(io::Error::other)
  }
}

impl FileSystem for MemoryFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    let file = self.vfs_path(path)?;
    if !file.is_file().unwrap_or(false) {
      return Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
      ));
    }
    let mut content = Vec::new();
    file.open_file().map_err(io::Error::other)?.read_to_end(&mut content)?;
    Ok(content)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    let file = self.vfs_path(path)?;
    let mut writer = file.create_file().map_err(io::Error::other)?;
    writer.write_all(content)?;
    writer.flush()
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    let dir = self.vfs_path(path)?;
    if dir.as_str().is_empty() {
      return Ok(());
    }
    dir.create_dir_all().map_err(io::Error::other)
  }

  fn is_file(&self, path: &Path) -> bool {
    self.vfs_path(path).is_ok_and(|file| file.is_file().unwrap_or(false))
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.vfs_path(path).is_ok_and(|dir| dir.is_dir().unwrap_or(false))
  }
}

impl OxcResolverFileSystem for MemoryFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    String::from_utf8(self.read(path)?)
      .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
  }

  fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    let metadata = self
      .vfs_path(path)?
      .metadata()
      .map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))?;
    let is_file = metadata.file_type == VfsFileType::File;
    let is_dir = metadata.file_type == VfsFileType::Directory;
    Ok(FileMetadata::new(is_file, is_dir, false))
  }

  fn symlink_metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    self.metadata(path)
  }

  fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    Err(io::Error::new(io::ErrorKind::InvalidInput, format!("{} is not a link", path.display())))
  }
}
