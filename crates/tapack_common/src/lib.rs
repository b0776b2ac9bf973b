mod bundler_options;
mod chunk;
mod module;
mod module_loader;
mod template;
mod types;

/// Name given to a single-path entry.
pub const DEFAULT_ENTRY_NAME: &str = "main";
/// Chunk that collects every module resolved from `node_modules`.
pub const VENDORS_CHUNK_NAME: &str = "vendors";
/// Chunk that collects every other module owned by two or more chunks.
pub const COMMONS_CHUNK_NAME: &str = "commons";
/// Runtime function that rewritten `require` and `import()` calls go through.
pub const REQUIRE_FN_NAME: &str = "__tapack_require__";
/// Prefix of the chunk name an unnamed `import()` carries until seal numbers it.
pub const SYNTHETIC_CHUNK_PREFIX: &str = "\0synthetic:";

pub fn is_synthetic_chunk_name(name: &str) -> bool {
  name.starts_with(SYNTHETIC_CHUNK_PREFIX)
}

pub fn is_reserved_chunk_name(name: &str) -> bool {
  matches!(name, VENDORS_CHUNK_NAME | COMMONS_CHUNK_NAME)
}

pub use crate::{
  bundler_options::{
    BundlerOptions, ModuleOptions, ModuleRule, OutputOptions, ResolveOptions,
    entry_option::EntryOption,
    filename_template::FilenameTemplate,
    normalized_bundler_options::{NormalizedBundlerOptions, SharedOptions},
  },
  chunk::{Chunk, ChunkKind},
  module::{
    Module,
    dependency::{AsyncBlock, DependencyDescriptor},
  },
  module_loader::{ModuleLoaderMsg, ModuleTaskResult},
  template::{
    BundleTemplate, ChunkTemplateData, MainTemplateData, RenderedModule, SharedTemplate,
  },
  types::{
    entry_point::{EntryPoint, EntryPointKind},
    entry_root::EntryRoot,
    idx::{ChunkIdx, ModuleIdx},
    module_id::ModuleId,
    output_asset::OutputAsset,
    stats::{Stats, StatsAsset, StatsChunk, StatsEntry, StatsModule},
  },
};
