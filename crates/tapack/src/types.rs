use std::{path::PathBuf, sync::Arc};

use tapack_common::{EntryOption, EntryRoot};
use tapack_resolver::Resolver;

use crate::{compilation::Compilation, plugin::Plugin};

pub type SharedResolver = Arc<Resolver>;
pub type SharedCompilation = Arc<Compilation>;
pub type SharedPlugin = Arc<dyn Plugin>;

/// Argument of the `entryOption` hook.
#[derive(Debug, Clone)]
pub struct EntryOptionArgs {
  pub context: PathBuf,
  pub entry: EntryOption,
}

/// Argument of the `beforeCompile` and `compile` hooks. Shared by the compilation it creates.
#[derive(Debug, Clone)]
pub struct CompilationParams {
  pub entries: Arc<[EntryRoot]>,
}
