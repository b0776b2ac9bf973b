use std::sync::Arc;

use arcstr::ArcStr;
use tapack_utils::indexmap::FxIndexMap;

use crate::ModuleId;

#[derive(Debug, Clone)]
pub struct RenderedModule {
  pub id: ModuleId,
  pub code: ArcStr,
}

/// Everything an entry chunk's bundle needs.
#[derive(Debug)]
pub struct MainTemplateData<'a> {
  pub chunk_name: &'a str,
  pub entry_id: &'a ModuleId,
  pub modules: &'a [RenderedModule],
  /// Shared chunks that must be loaded before the entry module runs.
  pub deferred_chunks: &'a [ArcStr],
  /// Chunk name to emitted file name, for every chunk that can be loaded on demand.
  pub chunk_files: &'a FxIndexMap<ArcStr, String>,
}

#[derive(Debug)]
pub struct ChunkTemplateData<'a> {
  pub chunk_name: &'a str,
  pub modules: &'a [RenderedModule],
}

/// Turns chunk data into bundle text.
pub trait BundleTemplate: Send + Sync {
  fn render_main(&self, data: &MainTemplateData<'_>) -> anyhow::Result<String>;

  fn render_chunk(&self, data: &ChunkTemplateData<'_>) -> anyhow::Result<String>;
}

pub type SharedTemplate = Arc<dyn BundleTemplate>;
