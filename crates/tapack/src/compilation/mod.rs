mod hooks;

use std::sync::Arc;

use itertools::Itertools;
use parking_lot::Mutex;
use tapack_common::{
  EntryPointKind, EntryRoot, OutputAsset, SharedOptions, Stats, StatsAsset, StatsChunk,
  StatsEntry, StatsModule,
};
use tapack_error::BuildResult;
use tapack_fs::SharedFileSystem;
use tapack_resolver::Resolver;
use tapack_utils::indexmap::FxIndexMap;

pub use self::hooks::CompilationHooks;
use crate::{
  module_graph::ModuleGraph,
  module_loader::ModuleLoader,
  stages::{
    generate::generate,
    seal::{ChunkGraph, seal},
  },
  types::{CompilationParams, SharedResolver},
};

/// State of one build. Created fresh by every `Compiler::run`.
pub struct Compilation {
  pub options: SharedOptions,
  pub fs: SharedFileSystem,
  pub resolver: SharedResolver,
  pub hooks: Arc<CompilationHooks>,
  pub params: CompilationParams,
  pub module_graph: Mutex<ModuleGraph>,
  pub chunk_graph: Mutex<ChunkGraph>,
  /// Filename to asset. Filled by [`Compilation::seal`], editable in the `emit` hook.
  pub assets: Mutex<FxIndexMap<String, OutputAsset>>,
}

impl Compilation {
  pub fn new(options: SharedOptions, fs: SharedFileSystem, params: CompilationParams) -> Self {
    let resolver = Arc::new(Resolver::new(
      options.context.clone(),
      options.extensions.clone(),
      Arc::clone(&fs),
    ));
    Self {
      options,
      fs,
      resolver,
      hooks: Arc::new(CompilationHooks::default()),
      params,
      module_graph: Mutex::default(),
      chunk_graph: Mutex::default(),
      assets: Mutex::default(),
    }
  }

  /// Entry roots this compilation was created for.
  pub fn entries(&self) -> &[EntryRoot] {
    &self.params.entries
  }

  /// Builds the module graph of `roots` concurrently. Resolves once every nested dependency and
  /// `import()` target has been built, or with every error that occurred.
  pub async fn add_entries(self: &Arc<Self>, roots: Vec<EntryRoot>) -> BuildResult<()> {
    ModuleLoader::new(self).add_entries(roots).await
  }

  /// Freezes the module graph, partitions it into chunks and renders every chunk to an asset.
  pub fn seal(&self) -> BuildResult<()> {
    seal(self)?;
    generate(self)
  }

  pub fn emit_asset(&self, asset: OutputAsset) {
    self.assets.lock().insert(asset.filename.clone(), asset);
  }

  pub fn stats(&self) -> Stats {
    let module_graph = self.module_graph.lock();
    let chunk_graph = self.chunk_graph.lock();

    let entries = module_graph
      .entry_points
      .iter()
      .filter_map(|entry_point| match entry_point.kind {
        EntryPointKind::UserDefined { order } => Some((order, entry_point)),
        EntryPointKind::DynamicImport => None,
      })
      .sorted_by_key(|(order, _)| *order)
      .map(|(_, entry_point)| StatsEntry {
        name: entry_point.name.to_string(),
        module_id: entry_point.module_id.to_string(),
      })
      .collect();

    let modules = module_graph
      .modules()
      .sorted_by(|a, b| a.id.cmp(&b.id))
      .map(|module| StatsModule {
        id: module.id.to_string(),
        names: module.names.iter().map(ToString::to_string).collect(),
        resource: module.resource.to_string(),
      })
      .collect();

    let chunks = chunk_graph
      .chunks
      .iter()
      .map(|chunk| StatsChunk {
        name: chunk.name.to_string(),
        files: chunk.files.clone(),
        modules: chunk
          .modules
          .iter()
          .map(|idx| module_graph.ids[*idx].to_string())
          .collect(),
        is_async: chunk.is_async,
      })
      .collect();

    let assets = self
      .assets
      .lock()
      .values()
      .map(|asset| StatsAsset { filename: asset.filename.clone(), size: asset.content.len() })
      .collect();

    let file_dependencies = module_graph.file_dependencies.iter().sorted().cloned().collect();

    Stats { entries, modules, chunks, assets, file_dependencies }
  }
}

impl std::fmt::Debug for Compilation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Compilation").field("params", &self.params).finish_non_exhaustive()
  }
}
