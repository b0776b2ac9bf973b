mod default_template;

use anyhow::Context;
use arcstr::ArcStr;
use itertools::Itertools;
use tapack_common::{
  COMMONS_CHUNK_NAME, ChunkKind, ChunkTemplateData, MainTemplateData, OutputAsset,
  RenderedModule, VENDORS_CHUNK_NAME,
};
use tapack_error::BuildResult;
use tapack_utils::indexmap::{FxIndexMap, fx_index_map_with_capacity};

pub use self::default_template::DefaultTemplate;
use crate::compilation::Compilation;

/// Renders every chunk of the sealed compilation into the asset map.
pub fn generate(compilation: &Compilation) -> BuildResult<()> {
  let module_graph = compilation.module_graph.lock();
  let chunk_graph = compilation.chunk_graph.lock();
  let template = &compilation.options.template;

  let deferred_chunks = [COMMONS_CHUNK_NAME, VENDORS_CHUNK_NAME]
    .into_iter()
    .filter(|name| chunk_graph.chunk_by_name(name).is_some_and(|chunk| chunk.is_shared()))
    .map(ArcStr::from)
    .collect_vec();

  let chunk_files: FxIndexMap<ArcStr, String> = chunk_graph
    .chunks
    .iter()
    .filter(|chunk| chunk.is_async)
    .filter_map(|chunk| Some((chunk.name.clone(), chunk.files.first()?.clone())))
    .collect();

  let mut assets = fx_index_map_with_capacity(chunk_graph.chunks.len());
  for chunk in &chunk_graph.chunks {
    let modules = chunk
      .modules
      .iter()
      .filter_map(|idx| module_graph.module(*idx))
      .map(|module| RenderedModule { id: module.id.clone(), code: module.source.clone() })
      .collect_vec();

    let content = match chunk.kind {
      ChunkKind::EntryPoint => {
        let entry_id = chunk
          .entry_module
          .map(|idx| &module_graph.ids[idx])
          .with_context(|| format!("Entry chunk `{}` has no entry module", chunk.name))?;
        template.render_main(&MainTemplateData {
          chunk_name: &chunk.name,
          entry_id,
          modules: &modules,
          deferred_chunks: &deferred_chunks,
          chunk_files: &chunk_files,
        })
      }
      ChunkKind::Async | ChunkKind::Vendors | ChunkKind::Commons => {
        template.render_chunk(&ChunkTemplateData { chunk_name: &chunk.name, modules: &modules })
      }
    }
    .with_context(|| format!("Failed to render chunk `{}`", chunk.name))?;

    for filename in &chunk.files {
      tracing::debug!(chunk = %chunk.name, filename, "rendered");
      assets.insert(
        filename.clone(),
        OutputAsset { filename: filename.clone(), content: content.clone() },
      );
    }
  }

  *compilation.assets.lock() = assets;
  Ok(())
}
