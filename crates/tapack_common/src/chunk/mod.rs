use arcstr::ArcStr;

use crate::ModuleIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
  /// Rooted at a user-defined entry.
  EntryPoint,
  /// Rooted at one or more `import()` sites sharing a chunk name.
  Async,
  Vendors,
  Commons,
}

#[derive(Debug, Clone)]
pub struct Chunk {
  pub name: ArcStr,
  pub kind: ChunkKind,
  /// The module the chunk is rooted at. For `vendors` and `commons` this is the first member.
  pub entry_module: Option<ModuleIdx>,
  pub is_async: bool,
  /// Sorted by module id.
  pub modules: Vec<ModuleIdx>,
  pub files: Vec<String>,
}

impl Chunk {
  pub fn new(name: ArcStr, kind: ChunkKind, entry_module: Option<ModuleIdx>) -> Self {
    let is_async = !matches!(kind, ChunkKind::EntryPoint);
    Self { name, kind, entry_module, is_async, modules: vec![], files: vec![] }
  }

  pub fn is_shared(&self) -> bool {
    matches!(self.kind, ChunkKind::Vendors | ChunkKind::Commons)
  }
}
