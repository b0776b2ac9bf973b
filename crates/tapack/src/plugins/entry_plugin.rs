use tapack_error::BuildResult;

use crate::{compiler::CompilerHooks, plugin::Plugin, types::SharedCompilation};

/// Builds the compilation's entry roots during `make`.
#[derive(Debug, Default)]
pub struct EntryPlugin;

impl Plugin for EntryPlugin {
  fn apply(&self, hooks: &CompilerHooks) -> BuildResult<()> {
    hooks.make.tap(&*self.name(), |compilation: SharedCompilation| async move {
      let roots = compilation.entries().to_vec();
      compilation.add_entries(roots).await
    });
    Ok(())
  }
}
