use std::{path::PathBuf, sync::Arc};

use tapack_loader::LoaderItem;

use crate::{EntryOption, FilenameTemplate, ModuleRule, SharedTemplate};

pub struct NormalizedBundlerOptions {
  // --- Input
  pub entry: EntryOption,
  pub context: PathBuf,

  // --- Output
  pub output_path: PathBuf,
  pub filename: FilenameTemplate,
  pub template: SharedTemplate,

  // --- Module
  pub rules: Vec<ModuleRule>,

  // --- Resolve
  pub extensions: Vec<String>,
}

pub type SharedOptions = Arc<NormalizedBundlerOptions>;

impl NormalizedBundlerOptions {
  /// Loaders of every rule matching `resource`, in rule order.
  pub fn loaders_for(&self, resource: &str) -> Vec<LoaderItem> {
    self
      .rules
      .iter()
      .filter(|rule| rule.test.is_match(resource))
      .flat_map(|rule| rule.loaders.iter().cloned())
      .collect()
  }
}

impl std::fmt::Debug for NormalizedBundlerOptions {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NormalizedBundlerOptions")
      .field("entry", &self.entry)
      .field("context", &self.context)
      .field("output_path", &self.output_path)
      .field("filename", &self.filename)
      .field("rules", &self.rules)
      .field("extensions", &self.extensions)
      .finish_non_exhaustive()
  }
}
