use std::{
  ops::ControlFlow,
  path::{Path, PathBuf},
};

use notify::{EventKind, RecursiveMode, Watcher};
use tapack_common::Stats;
use tapack_error::BuildResult;
use tokio::sync::mpsc::UnboundedReceiver;

use super::Compiler;

impl Compiler {
  /// Builds, then rebuilds from scratch whenever a file dependency of the last successful build
  /// changes. `handler` sees every result and stops the loop by returning `Break`.
  ///
  /// The error of the first build is returned. Later failures keep the previous watch set.
  pub async fn watch<F>(&self, mut handler: F) -> BuildResult<()>
  where
    F: FnMut(&BuildResult<Stats>) -> ControlFlow<()>,
  {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
      let _ = tx.send(event);
    })
    .map_err(anyhow::Error::from)?;

    let mut watched: Vec<PathBuf> = vec![];
    let mut is_first_build = true;

    loop {
      let result = self.run().await;

      if let Ok(stats) = &result {
        for path in watched.drain(..) {
          let _ = watcher.unwatch(&path);
        }
        for dependency in &stats.file_dependencies {
          let path = Path::new(dependency);
          match watcher.watch(path, RecursiveMode::NonRecursive) {
            Ok(()) => watched.push(path.to_path_buf()),
            Err(err) => tracing::warn!(path = %dependency, %err, "cannot watch file"),
          }
        }
        tracing::info!(files = watched.len(), "watching for changes");
      }

      let flow = handler(&result);
      if std::mem::take(&mut is_first_build) {
        result?;
      }
      if flow.is_break() {
        return Ok(());
      }

      let Some(changed) = next_change(&mut rx).await else {
        return Ok(());
      };
      self.hooks.invalid.call(&changed)?;
    }
  }
}

/// Waits for a content change, then drains whatever else arrived in the meantime.
async fn next_change(
  rx: &mut UnboundedReceiver<notify::Result<notify::Event>>,
) -> Option<PathBuf> {
  loop {
    match rx.recv().await? {
      Ok(event)
        if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)) =>
      {
        let changed = event.paths.into_iter().next().unwrap_or_default();
        while rx.try_recv().is_ok() {}
        return Some(changed);
      }
      Ok(_) => {}
      Err(err) => tracing::warn!(%err, "watch error"),
    }
  }
}
