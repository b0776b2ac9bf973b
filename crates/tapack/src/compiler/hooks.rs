use std::{path::PathBuf, sync::Arc};

use tapack_common::{EntryRoot, SharedOptions, Stats};
use tapack_hooks::{AsyncParallelHook, AsyncSeriesHook, SyncBailHook, SyncHook};

use crate::types::{CompilationParams, EntryOptionArgs, SharedCompilation};

/// Hooks that live as long as the compiler, across every rebuild.
#[derive(Debug)]
pub struct CompilerHooks {
  pub entry_option: SyncBailHook<EntryOptionArgs, Vec<EntryRoot>>,
  pub before_run: AsyncSeriesHook<SharedOptions>,
  pub run: AsyncSeriesHook<SharedOptions>,
  pub before_compile: AsyncSeriesHook<CompilationParams>,
  pub compile: SyncHook<CompilationParams>,
  pub this_compilation: SyncHook<SharedCompilation>,
  pub compilation: SyncHook<SharedCompilation>,
  pub make: AsyncParallelHook<SharedCompilation>,
  pub after_compile: AsyncSeriesHook<SharedCompilation>,
  /// Last chance to change `compilation.assets` before they are written.
  pub emit: AsyncSeriesHook<SharedCompilation>,
  pub done: AsyncSeriesHook<Arc<Stats>>,
  /// Fired in watch mode with the changed path, before the rebuild starts.
  pub invalid: SyncHook<PathBuf>,
}

impl Default for CompilerHooks {
  fn default() -> Self {
    Self {
      entry_option: SyncBailHook::new("entryOption"),
      before_run: AsyncSeriesHook::new("beforeRun"),
      run: AsyncSeriesHook::new("run"),
      before_compile: AsyncSeriesHook::new("beforeCompile"),
      compile: SyncHook::new("compile"),
      this_compilation: SyncHook::new("thisCompilation"),
      compilation: SyncHook::new("compilation"),
      make: AsyncParallelHook::new("make"),
      after_compile: AsyncSeriesHook::new("afterCompile"),
      emit: AsyncSeriesHook::new("emit"),
      done: AsyncSeriesHook::new("done"),
      invalid: SyncHook::new("invalid"),
    }
  }
}
