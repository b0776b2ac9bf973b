use std::sync::Arc;

use tapack_common::{ModuleLoaderMsg, SharedOptions};
use tapack_fs::SharedFileSystem;

use crate::{compilation::CompilationHooks, types::SharedResolver};

/// Used to store common data shared between all tasks.
pub struct TaskContext {
  pub fs: SharedFileSystem,
  pub options: SharedOptions,
  pub resolver: SharedResolver,
  pub hooks: Arc<CompilationHooks>,
  pub tx: tokio::sync::mpsc::Sender<ModuleLoaderMsg>,
}
