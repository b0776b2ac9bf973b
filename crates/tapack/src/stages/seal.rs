use std::collections::BTreeMap;

use arcstr::ArcStr;
use itertools::Itertools;
use oxc::{
  ast::{AstBuilder, ast::StringLiteral},
  ast_visit::VisitMut,
};
use oxc_index::IndexVec;
use rustc_hash::{FxHashMap, FxHashSet};
use tapack_common::{
  COMMONS_CHUNK_NAME, Chunk, ChunkIdx, ChunkKind, EntryPoint, EntryPointKind, FilenameTemplate,
  Module, ModuleId, ModuleIdx, SYNTHETIC_CHUNK_PREFIX, VENDORS_CHUNK_NAME,
  is_synthetic_chunk_name,
};
use tapack_ecmascript::EcmaCompiler;
use tapack_error::{BuildResult, BundleError};

use crate::{compilation::Compilation, module_graph::ModuleGraph};

/// Chunks of a sealed compilation and the classification they were built from.
#[derive(Debug, Default)]
pub struct ChunkGraph {
  pub chunks: IndexVec<ChunkIdx, Chunk>,
  pub vendors: Vec<ModuleIdx>,
  pub commons: Vec<ModuleIdx>,
  pub remaining: Vec<ModuleIdx>,
  /// Owner count per module.
  pub reference_counts: FxHashMap<ModuleId, usize>,
}

impl ChunkGraph {
  pub fn chunk_by_name(&self, name: &str) -> Option<&Chunk> {
    self.chunks.iter().find(|chunk| chunk.name.as_str() == name)
  }

  /// Sorts modules into vendors, commons and the rest, then lays out the chunks.
  pub fn build(graph: &ModuleGraph, filename: &FilenameTemplate) -> BuildResult<Self> {
    let mut chunk_graph = Self::default();

    let sorted_modules = graph.modules().sorted_by(|a, b| a.id.cmp(&b.id)).collect_vec();
    for module in &sorted_modules {
      let owners = graph.names[module.idx].len();
      chunk_graph.reference_counts.insert(module.id.clone(), owners);
      if module.is_vendor() {
        tracing::debug!(id = %module.id, "classified as vendor");
        chunk_graph.vendors.push(module.idx);
      } else if owners >= 2 {
        tracing::debug!(id = %module.id, owners, "classified as common");
        chunk_graph.commons.push(module.idx);
      } else {
        chunk_graph.remaining.push(module.idx);
      }
    }

    let owned_by = |name: &str| {
      chunk_graph
        .remaining
        .iter()
        .copied()
        .filter(|idx| graph.names[*idx].first().is_some_and(|owner| owner.as_str() == name))
        .collect_vec()
    };

    let user_entries = graph
      .entry_points
      .iter()
      .filter_map(|entry_point| match entry_point.kind {
        EntryPointKind::UserDefined { order } => Some((order, entry_point)),
        EntryPointKind::DynamicImport => None,
      })
      .sorted_by_key(|(order, _)| *order)
      .map(|(_, entry_point)| entry_point)
      .collect_vec();
    let user_entry_names =
      user_entries.iter().map(|entry_point| entry_point.name.as_str()).collect::<FxHashSet<_>>();

    let mut chunks = vec![];
    for entry_point in &user_entries {
      let mut chunk =
        Chunk::new(entry_point.name.clone(), ChunkKind::EntryPoint, Some(entry_point.idx));
      chunk.modules = owned_by(entry_point.name.as_str());
      chunks.push(chunk);
    }

    // `import()` sites sharing a chunk name load the same chunk.
    let mut async_groups: BTreeMap<ArcStr, Vec<&EntryPoint>> = BTreeMap::new();
    for entry_point in &graph.entry_points {
      if matches!(entry_point.kind, EntryPointKind::DynamicImport)
        && !user_entry_names.contains(entry_point.name.as_str())
      {
        async_groups.entry(entry_point.name.clone()).or_default().push(entry_point);
      }
    }
    for (name, entry_points) in async_groups {
      let representative =
        entry_points.iter().min_by(|a, b| a.module_id.cmp(&b.module_id)).map(|it| it.idx);
      let mut chunk = Chunk::new(name, ChunkKind::Async, representative);
      chunk.modules = owned_by(chunk.name.as_str());
      chunks.push(chunk);
    }

    for (name, kind, modules) in [
      (VENDORS_CHUNK_NAME, ChunkKind::Vendors, &chunk_graph.vendors),
      (COMMONS_CHUNK_NAME, ChunkKind::Commons, &chunk_graph.commons),
    ] {
      if !modules.is_empty() {
        let mut chunk = Chunk::new(name.into(), kind, modules.first().copied());
        chunk.modules.clone_from(modules);
        chunks.push(chunk);
      }
    }

    if chunks.len() > 1 && !filename.has_name_placeholder() {
      Err(BundleError::configuration(format!(
        "`output.filename` is `{}` but {} chunks were produced; use `[name]` to give each chunk its own file",
        filename.template(),
        chunks.len()
      )))?;
    }

    let mut seen_files = FxHashMap::default();
    for chunk in &mut chunks {
      let file = filename.render(&chunk.name);
      if let Some(other) = seen_files.insert(file.clone(), chunk.name.clone()) {
        Err(BundleError::configuration(format!(
          "Chunks `{other}` and `{}` would both be written to `{file}`",
          chunk.name
        )))?;
      }
      chunk.files.push(file);
    }

    chunk_graph.chunks = chunks.into_iter().collect();
    Ok(chunk_graph)
  }
}

/// Chunk placeholders of unnamed `import()` calls become "0", "1", ... in target id order,
/// skipping names already in use. Modules that load them are printed again.
fn number_synthetic_chunks(graph: &mut ModuleGraph) {
  let taken = graph
    .entry_points
    .iter()
    .map(|entry_point| entry_point.name.clone())
    .filter(|name| !is_synthetic_chunk_name(name))
    .collect::<FxHashSet<_>>();
  let placeholders = graph
    .entry_points
    .iter()
    .map(|entry_point| entry_point.name.clone())
    .filter(|name| is_synthetic_chunk_name(name))
    .sorted()
    .dedup()
    .collect_vec();
  if placeholders.is_empty() {
    return;
  }

  let mut next = 0usize;
  let mut renames = FxHashMap::default();
  for placeholder in placeholders {
    let name = loop {
      let candidate = next.to_string();
      next += 1;
      if !taken.contains(candidate.as_str()) {
        break ArcStr::from(candidate);
      }
    };
    let target_id = placeholder.trim_start_matches(SYNTHETIC_CHUNK_PREFIX);
    tracing::debug!(target_id, %name, "numbered chunk");
    renames.insert(placeholder, name);
  }
  let rename = |name: &mut ArcStr| {
    if let Some(renamed) = renames.get(&*name) {
      name.clone_from(renamed);
      true
    } else {
      false
    }
  };

  for entry_point in &mut graph.entry_points {
    rename(&mut entry_point.name);
  }
  for names in graph.names.iter_mut() {
    if names.iter().any(|name| renames.contains_key(name)) {
      *names = names.iter().map(|name| renames.get(name).unwrap_or(name).clone()).collect();
    }
  }
  for module in graph.modules.iter_mut().flatten() {
    module.dependencies.iter_mut().for_each(|dependency| {
      rename(&mut dependency.name);
    });
    let mut loads_renamed = false;
    for block in &mut module.blocks {
      loads_renamed |= rename(&mut block.chunk_name);
    }
    if loads_renamed {
      reprint_with_chunk_names(module, &renames);
    }
  }
}

struct ChunkNameRewriter<'me, 'ast> {
  builder: AstBuilder<'ast>,
  renames: &'me FxHashMap<ArcStr, ArcStr>,
}

impl<'ast> VisitMut<'ast> for ChunkNameRewriter<'_, 'ast> {
  fn visit_string_literal(&mut self, literal: &mut StringLiteral<'ast>) {
    if let Some(name) = self.renames.get(literal.value.as_str()) {
      literal.value = self.builder.atom(name);
      literal.raw = None;
    }
  }
}

fn reprint_with_chunk_names(module: &mut Module, renames: &FxHashMap<ArcStr, ArcStr>) {
  module.ast.program.with_mut(|fields| {
    ChunkNameRewriter { builder: AstBuilder::new(fields.allocator), renames }
      .visit_program(fields.program);
  });
  module.source = EcmaCompiler::print(&module.ast).into();
}

/// Modules moved to `vendors` or `commons` are named after that chunk. The owner sets in the
/// graph are left alone.
fn assign_shared_names(graph: &mut ModuleGraph, chunk_graph: &ChunkGraph) {
  for (modules, name) in
    [(&chunk_graph.vendors, VENDORS_CHUNK_NAME), (&chunk_graph.commons, COMMONS_CHUNK_NAME)]
  {
    for idx in modules {
      if let Some(module) = graph.modules[*idx].as_mut() {
        module.names = [ArcStr::from(name)].into_iter().collect();
      }
    }
  }
}

/// Owner names flow along `require` edges until nothing changes, so a module required from
/// chain N belongs to N no matter which chain reserved it first.
fn propagate_owners(graph: &mut ModuleGraph) {
  let edges = graph
    .modules
    .iter()
    .map(|module| {
      module.as_ref().map_or_else(Vec::new, |module| {
        module
          .dependencies
          .iter()
          .filter_map(|dependency| graph.idx_of(&dependency.module_id))
          .filter(|target| *target != module.idx)
          .collect_vec()
      })
    })
    .collect::<IndexVec<ModuleIdx, _>>();

  let mut changed = true;
  while changed {
    changed = false;
    for (from, targets) in edges.iter().enumerate() {
      let from = ModuleIdx::from(from);
      for &to in targets {
        let inherited = graph.names[from]
          .iter()
          .filter(|name| !graph.names[to].contains(*name))
          .cloned()
          .collect_vec();
        if !inherited.is_empty() {
          graph.names[to].extend(inherited);
          changed = true;
        }
      }
    }
  }

  for (idx, names) in graph.names.iter_mut().enumerate() {
    names.sort();
    if let Some(module) = graph.modules[ModuleIdx::from(idx)].as_mut() {
      module.names.clone_from(names);
    }
  }
}

pub fn seal(compilation: &Compilation) -> BuildResult<()> {
  compilation.hooks.seal.call(&())?;

  {
    let mut graph = compilation.module_graph.lock();
    if graph.is_sealed() {
      Err(anyhow::anyhow!("The compilation has already been sealed"))?;
    }
    graph.freeze();
    number_synthetic_chunks(&mut graph);
    propagate_owners(&mut graph);
  }

  compilation.hooks.before_chunks.call(&())?;
  let chunk_graph = {
    let mut graph = compilation.module_graph.lock();
    let chunk_graph = ChunkGraph::build(&graph, &compilation.options.filename)?;
    assign_shared_names(&mut graph, &chunk_graph);
    chunk_graph
  };
  tracing::info!(
    chunks = chunk_graph.chunks.len(),
    vendors = chunk_graph.vendors.len(),
    commons = chunk_graph.commons.len(),
    "sealed"
  );
  compilation.hooks.after_chunks.call(&chunk_graph)?;
  *compilation.chunk_graph.lock() = chunk_graph;
  Ok(())
}
