use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
};

use arcstr::ArcStr;
use dashmap::DashMap;
use oxc_resolver::{
  FileMetadata, FileSystem as OxcResolverFileSystem, FsCache, ResolveOptions as OxcResolverOptions,
  ResolverGeneric,
};
use sugar_path::SugarPath;
use tapack_error::BundleError;
use tapack_fs::SharedFileSystem;
use tapack_utils::path_ext::PathExt;

/// Directory under the context that bare requests are looked up in.
pub const NODE_MODULES: &str = "node_modules";

pub fn is_relative_request(request: &str) -> bool {
  matches!(request, "." | "..") || request.starts_with("./") || request.starts_with("../")
}

/// Lets the resolver read through whichever file system the build runs on.
#[derive(Clone)]
struct SharedResolverFileSystem(SharedFileSystem);

impl OxcResolverFileSystem for SharedResolverFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    self.0.read_to_string(path)
  }

  fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    self.0.metadata(path)
  }

  fn symlink_metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    self.0.symlink_metadata(path)
  }

  fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    self.0.read_link(path)
  }
}

#[derive(Debug, Clone)]
pub struct ResolveReturn {
  pub path: PathBuf,
  /// `path` with forward slashes.
  pub resource: ArcStr,
  /// `./`-prefixed forward-slash path from the context to `path`.
  pub id: ArcStr,
}

pub struct Resolver {
  context: PathBuf,
  extensions: Vec<String>,
  inner: ResolverGeneric<FsCache<SharedResolverFileSystem>>,
  resolved_cache: DashMap<(PathBuf, String), ResolveReturn>,
}

impl std::fmt::Debug for Resolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Resolver")
      .field("context", &self.context)
      .field("extensions", &self.extensions)
      .finish_non_exhaustive()
  }
}

impl Resolver {
  pub fn new(context: PathBuf, extensions: Vec<String>, fs: SharedFileSystem) -> Self {
    let options = OxcResolverOptions {
      extensions: extensions.clone(),
      // Bare requests only look in the context's own `node_modules`.
      modules: vec![context.join(NODE_MODULES).to_string_lossy().into_owned()],
      main_fields: vec!["main".to_string()],
      main_files: vec!["index".to_string()],
      symlinks: false,
      ..Default::default()
    };
    let inner =
      ResolverGeneric::new_with_cache(Arc::new(FsCache::new(SharedResolverFileSystem(fs))), options);
    Self { context, extensions, inner, resolved_cache: DashMap::default() }
  }

  pub fn context(&self) -> &Path {
    &self.context
  }

  pub fn extensions(&self) -> &[String] {
    &self.extensions
  }

  /// Resolves `request` as written in `importer`. Without an importer, relative requests are
  /// resolved against the context.
  pub fn resolve(
    &self,
    importer: Option<&Path>,
    request: &str,
  ) -> Result<ResolveReturn, BundleError> {
    let dir = importer.and_then(Path::parent).unwrap_or(&self.context).to_path_buf();
    let key = (dir, request.to_string());
    if let Some(resolved) = self.resolved_cache.get(&key) {
      return Ok(resolved.value().clone());
    }

    let resolution = self.inner.resolve(&key.0, request).map_err(|err| {
      tracing::debug!(request, %err, "cannot resolve");
      let importer = importer.map_or_else(
        || self.context.to_slash_lossy().into_owned(),
        |importer| importer.dot_relative_slash(&self.context),
      );
      BundleError::Resolution { importer, request: request.to_string() }
    })?;

    let path = resolution.path().normalize();
    tracing::trace!(request, resolved = %path.display(), "resolved");
    let resource = path.to_slash_lossy().into_owned().into();
    let id = path.dot_relative_slash(&self.context).into();
    let resolved = ResolveReturn { path, resource, id };
    self.resolved_cache.insert(key, resolved.clone());
    Ok(resolved)
  }
}
