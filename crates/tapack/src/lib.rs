//! Bundles a tree of script modules into chunks: entries, shared `vendors` / `commons`, and
//! chunks loaded on demand through `import()`.

mod compilation;
mod compiler;
mod module_graph;
mod module_loader;
mod plugin;
mod plugins;
mod stages;
mod types;
mod utils;

pub use crate::{
  compilation::{Compilation, CompilationHooks},
  compiler::{Compiler, CompilerHooks},
  module_graph::{ModuleGraph, Reservation},
  plugin::Plugin,
  plugins::{EntryOptionPlugin, EntryPlugin, LoggingPlugin},
  stages::{generate::DefaultTemplate, seal::ChunkGraph},
  types::{CompilationParams, EntryOptionArgs, SharedCompilation, SharedPlugin, SharedResolver},
  utils::normalize_options::normalize_options,
};
pub use tapack_common::*;
pub use tapack_error::{BuildError, BuildResult, BundleError};
pub use tapack_fs::{FileSystem, MemoryFileSystem, OsFileSystem, SharedFileSystem};
pub use tapack_hooks::{AsyncParallelHook, AsyncSeriesHook, HookKind, SyncBailHook, SyncHook};
pub use tapack_loader::{
  Content, Loader, LoaderCallback, LoaderContext, LoaderData, LoaderItem, LoaderOutput,
};
