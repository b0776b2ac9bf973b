use arcstr::ArcStr;

use crate::{ModuleId, ModuleIdx};

/// A module that roots a chunk.
#[derive(Debug, Clone)]
pub struct EntryPoint {
  pub name: ArcStr,
  pub idx: ModuleIdx,
  pub module_id: ModuleId,
  pub kind: EntryPointKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPointKind {
  /// Configured by the user. `order` is the position in the entry option.
  UserDefined { order: usize },
  /// Reached through an `import()` expression.
  DynamicImport,
}
