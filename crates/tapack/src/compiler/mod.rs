mod hooks;
mod watch;

use std::{sync::Arc, time::Instant};

use anyhow::Context;
use tapack_common::{BundlerOptions, SharedOptions, Stats};
use tapack_error::{BuildResult, BundleError};
use tapack_fs::SharedFileSystem;
use tracing::Instrument;

pub use self::hooks::CompilerHooks;
use crate::{
  compilation::Compilation,
  plugins::{EntryOptionPlugin, EntryPlugin},
  types::{CompilationParams, EntryOptionArgs, SharedPlugin},
  utils::normalize_options::normalize_options,
};

/// Drives builds: normalizes options once, then runs the hook sequence for every build.
pub struct Compiler {
  pub hooks: CompilerHooks,
  options: SharedOptions,
  fs: SharedFileSystem,
}

impl Compiler {
  pub fn new(options: BundlerOptions, fs: SharedFileSystem) -> BuildResult<Self> {
    Self::with_plugins(options, fs, vec![])
  }

  /// User plugins are applied in order, before the built-in entry plugins.
  pub fn with_plugins(
    options: BundlerOptions,
    fs: SharedFileSystem,
    plugins: Vec<SharedPlugin>,
  ) -> BuildResult<Self> {
    let options = Arc::new(normalize_options(options)?);
    let hooks = CompilerHooks::default();

    let builtins: [SharedPlugin; 2] = [Arc::new(EntryOptionPlugin), Arc::new(EntryPlugin)];
    for plugin in plugins.iter().chain(builtins.iter()) {
      tracing::debug!(plugin = %plugin.name(), "apply plugin");
      plugin.apply(&hooks)?;
    }

    Ok(Self { hooks, options, fs })
  }

  pub fn options(&self) -> &SharedOptions {
    &self.options
  }

  /// Runs one full build and writes its assets. Returns either every error or the stats.
  pub async fn run(&self) -> BuildResult<Stats> {
    let span = tracing::info_span!("compiler_run", context = %self.options.context.display());
    self.run_inner().instrument(span).await
  }

  async fn run_inner(&self) -> BuildResult<Stats> {
    let start = Instant::now();

    let args =
      EntryOptionArgs { context: self.options.context.clone(), entry: self.options.entry.clone() };
    let Some(entries) = self.hooks.entry_option.call(&args)? else {
      return Err(BundleError::configuration("No plugin handled the `entry` option").into());
    };

    self.hooks.before_run.call(Arc::clone(&self.options)).await?;
    self.hooks.run.call(Arc::clone(&self.options)).await?;

    let params = CompilationParams { entries: entries.into() };
    self.hooks.before_compile.call(params.clone()).await?;
    self.hooks.compile.call(&params)?;

    let compilation =
      Arc::new(Compilation::new(Arc::clone(&self.options), Arc::clone(&self.fs), params));
    self.hooks.this_compilation.call(&compilation)?;
    self.hooks.compilation.call(&compilation)?;

    tracing::info!("make");
    self.hooks.make.call(Arc::clone(&compilation)).await?;

    tracing::info!("seal");
    compilation.seal()?;
    self.hooks.after_compile.call(Arc::clone(&compilation)).await?;

    self.hooks.emit.call(Arc::clone(&compilation)).await?;
    self.emit_assets(&compilation)?;

    let stats = Arc::new(compilation.stats());
    self.hooks.done.call(Arc::clone(&stats)).await?;
    tracing::info!(elapsed = ?start.elapsed(), "done");

    Ok(Arc::unwrap_or_clone(stats))
  }

  /// Writes assets one by one. A failure part way leaves the files written so far in place.
  fn emit_assets(&self, compilation: &Compilation) -> BuildResult<()> {
    let output_path = &self.options.output_path;
    self
      .fs
      .create_dir_all(output_path)
      .with_context(|| format!("Failed to create {}", output_path.display()))?;

    for asset in compilation.assets.lock().values() {
      let path = output_path.join(asset.filename());
      if let Some(parent) = path.parent().filter(|parent| *parent != output_path.as_path()) {
        self
          .fs
          .create_dir_all(parent)
          .with_context(|| format!("Failed to create {}", parent.display()))?;
      }
      self
        .fs
        .write(&path, asset.content_as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
      tracing::debug!(path = %path.display(), size = asset.content.len(), "emitted");
    }
    Ok(())
  }
}

impl std::fmt::Debug for Compiler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Compiler").field("options", &self.options).finish_non_exhaustive()
  }
}
