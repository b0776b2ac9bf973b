use arcstr::ArcStr;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use tapack_common::{EntryPoint, Module, ModuleId, ModuleIdx};
use tapack_error::{BuildResult, BundleError};
use tapack_utils::indexmap::FxIndexSet;

/// Outcome of [`ModuleGraph::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
  /// First time the id is seen. The caller owns building the module.
  Created(ModuleIdx),
  /// Already reserved. The owner name was recorded and nothing needs to be built.
  Existing(ModuleIdx),
}

impl Reservation {
  pub fn idx(self) -> ModuleIdx {
    match self {
      Self::Created(idx) | Self::Existing(idx) => idx,
    }
  }
}

/// All modules of one compilation, keyed by id.
#[derive(Debug, Default)]
pub struct ModuleGraph {
  pub modules: IndexVec<ModuleIdx, Option<Module>>,
  pub ids: IndexVec<ModuleIdx, ModuleId>,
  /// Owner chunk names per module, in the order they were recorded.
  pub names: IndexVec<ModuleIdx, FxIndexSet<ArcStr>>,
  pub entry_points: Vec<EntryPoint>,
  pub file_dependencies: FxIndexSet<String>,
  visited: FxHashMap<ModuleId, ModuleIdx>,
  sealed: bool,
}

impl ModuleGraph {
  /// Claims `id` for the chain `name`. Check and insert happen under the same borrow, so a module
  /// is built at most once.
  pub fn reserve(&mut self, id: &ModuleId, name: &ArcStr) -> BuildResult<Reservation> {
    if self.sealed {
      Err(anyhow::anyhow!("Cannot add module `{id}` to chunk `{name}` after the graph is sealed"))?;
    }

    if let Some(&idx) = self.visited.get(id) {
      let inserted = self.names[idx].insert(name.clone());
      tracing::debug!(%id, %name, new_owner = inserted, "reserve hit");
      return Ok(Reservation::Existing(idx));
    }

    let idx = self.modules.push(None);
    self.ids.push(id.clone());
    self.names.push(FxIndexSet::from_iter([name.clone()]));
    self.visited.insert(id.clone(), idx);
    Ok(Reservation::Created(idx))
  }

  pub fn store(&mut self, module: Module) {
    let idx = module.idx;
    self.file_dependencies.insert(module.resource.to_string());
    self.modules[idx] = Some(module);
  }

  /// Records an entry point unless the same module already roots a chunk of the same name.
  pub fn add_entry_point(&mut self, entry_point: EntryPoint) {
    let exists = self
      .entry_points
      .iter()
      .any(|existing| existing.name == entry_point.name && existing.idx == entry_point.idx);
    if !exists {
      self.entry_points.push(entry_point);
    }
  }

  pub fn idx_of(&self, id: &str) -> Option<ModuleIdx> {
    self.visited.get(id).copied()
  }

  pub fn module(&self, idx: ModuleIdx) -> Option<&Module> {
    self.modules[idx].as_ref()
  }

  pub fn module_by_id(&self, id: &str) -> Option<&Module> {
    self.idx_of(id).and_then(|idx| self.module(idx))
  }

  pub fn modules(&self) -> impl Iterator<Item = &Module> {
    self.modules.iter().flatten()
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  pub fn is_sealed(&self) -> bool {
    self.sealed
  }

  /// Rejects every later reservation.
  pub fn freeze(&mut self) {
    self.sealed = true;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reserve_dedups_and_records_owners() {
    let mut graph = ModuleGraph::default();
    let util = ModuleId::from("./src/util.js");

    let first = graph.reserve(&util, &"entry1".into()).unwrap();
    let second = graph.reserve(&util, &"entry2".into()).unwrap();
    let third = graph.reserve(&util, &"entry1".into()).unwrap();

    assert!(matches!(first, Reservation::Created(_)));
    assert_eq!(second, Reservation::Existing(first.idx()));
    assert_eq!(third, Reservation::Existing(first.idx()));
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.names[first.idx()].iter().map(ArcStr::as_str).collect::<Vec<_>>(), [
      "entry1", "entry2"
    ]);
  }

  #[test]
  fn sealed_graph_rejects_reservations() {
    let mut graph = ModuleGraph::default();
    graph.freeze();
    let err = graph.reserve(&ModuleId::from("./a.js"), &"main".into()).unwrap_err();
    assert!(err.to_string().contains("sealed"));
  }
}
