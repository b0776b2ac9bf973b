use tapack_common::ModuleId;
use tapack_hooks::SyncHook;

use crate::stages::seal::ChunkGraph;

/// Hooks of a single build. Tap them from the compiler's `thisCompilation` or `compilation` hook.
#[derive(Debug)]
pub struct CompilationHooks {
  pub build_module: SyncHook<ModuleId>,
  pub succeed_module: SyncHook<ModuleId>,
  pub seal: SyncHook<()>,
  pub before_chunks: SyncHook<()>,
  pub after_chunks: SyncHook<ChunkGraph>,
}

impl Default for CompilationHooks {
  fn default() -> Self {
    Self {
      build_module: SyncHook::new("buildModule"),
      succeed_module: SyncHook::new("succeedModule"),
      seal: SyncHook::new("seal"),
      before_chunks: SyncHook::new("beforeChunks"),
      after_chunks: SyncHook::new("afterChunks"),
    }
  }
}
