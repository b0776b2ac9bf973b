use std::{io, path::Path};

use oxc_resolver::FileSystem as OxcResolverFileSystem;

/// Read/write capability used by the resolver, the loader runner and the emitter.
///
/// Text reads, metadata and links come from the resolver's file system trait.
pub trait FileSystem: OxcResolverFileSystem + Send + Sync {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn is_file(&self, path: &Path) -> bool;

  fn is_dir(&self, path: &Path) -> bool;
}
