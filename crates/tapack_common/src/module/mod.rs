pub mod dependency;

use arcstr::ArcStr;
use tapack_ecmascript::EcmaAst;
use tapack_utils::indexmap::FxIndexSet;

use crate::{AsyncBlock, DependencyDescriptor, ModuleId, ModuleIdx};

#[derive(Debug)]
pub struct Module {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  /// Names of the chunks that own this module. Sorted once the graph is sealed.
  pub names: FxIndexSet<ArcStr>,
  /// Absolute path with forward slashes.
  pub resource: ArcStr,
  /// The bytes read from disk. `None` when a pitching loader short-circuited the read.
  pub raw_source: Option<Vec<u8>>,
  /// Source after loaders and dependency rewriting.
  pub source: ArcStr,
  pub ast: EcmaAst,
  pub dependencies: Vec<DependencyDescriptor>,
  pub blocks: Vec<AsyncBlock>,
}

impl Module {
  pub fn is_vendor(&self) -> bool {
    self.id.is_vendor()
  }

  pub fn owner_count(&self) -> usize {
    self.names.len()
  }
}
