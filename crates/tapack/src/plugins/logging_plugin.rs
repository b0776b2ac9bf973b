use std::{path::PathBuf, sync::Arc};

use tapack_common::{SharedOptions, Stats};
use tapack_error::BuildResult;

use crate::{compiler::CompilerHooks, plugin::Plugin, types::SharedCompilation};

/// Reports build progress through `tracing`.
#[derive(Debug, Default)]
pub struct LoggingPlugin;

impl Plugin for LoggingPlugin {
  fn apply(&self, hooks: &CompilerHooks) -> BuildResult<()> {
    let name = self.name();

    hooks.run.tap(&*name, |options: SharedOptions| async move {
      tracing::info!(context = %options.context.display(), "build started");
      Ok(())
    });

    hooks.invalid.tap(&*name, |path: &PathBuf| {
      tracing::info!(path = %path.display(), "file changed, rebuilding");
      Ok(())
    });

    hooks.emit.tap(&*name, |compilation: SharedCompilation| async move {
      let assets = compilation.assets.lock().len();
      tracing::info!(assets, output = %compilation.options.output_path.display(), "emitting");
      Ok(())
    });

    hooks.done.tap(&*name, |stats: Arc<Stats>| async move {
      tracing::info!(
        modules = stats.modules.len(),
        chunks = stats.chunks.len(),
        assets = stats.assets.len(),
        "build finished"
      );
      Ok(())
    });

    Ok(())
  }
}
