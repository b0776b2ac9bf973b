use std::path::PathBuf;

use arcstr::ArcStr;

use crate::ModuleId;

/// A `require(..)` found while scanning a module.
#[derive(Debug, Clone)]
pub struct DependencyDescriptor {
  /// Chunk the importing chain belongs to.
  pub name: ArcStr,
  pub context: PathBuf,
  /// The request as written in the source.
  pub request: String,
  pub resource: PathBuf,
  pub module_id: ModuleId,
}

/// An `import(..)` found while scanning a module. Roots a chunk of its own.
#[derive(Debug, Clone)]
pub struct AsyncBlock {
  pub context: PathBuf,
  pub request: String,
  pub resource: PathBuf,
  pub module_id: ModuleId,
  pub chunk_name: ArcStr,
  pub is_async: bool,
}
