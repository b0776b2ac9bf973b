pub mod entry_option;
pub mod filename_template;
pub mod normalized_bundler_options;

use std::path::PathBuf;

use regex::Regex;
use tapack_loader::LoaderItem;

use crate::{EntryOption, SharedTemplate};

#[derive(Default, Clone)]
pub struct BundlerOptions {
  // --- Input
  pub entry: Option<EntryOption>,
  /// Absolute root that module ids and relative entry requests are based on.
  pub context: Option<PathBuf>,

  // --- Output
  pub output: Option<OutputOptions>,
  pub template: Option<SharedTemplate>,

  // --- Module
  pub module: Option<ModuleOptions>,

  // --- Resolve
  pub resolve: Option<ResolveOptions>,
}

impl std::fmt::Debug for BundlerOptions {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BundlerOptions")
      .field("entry", &self.entry)
      .field("context", &self.context)
      .field("output", &self.output)
      .field("template", &self.template.as_ref().map(|_| "<template>"))
      .field("module", &self.module)
      .field("resolve", &self.resolve)
      .finish()
  }
}

#[derive(Default, Debug, Clone)]
pub struct OutputOptions {
  /// Defaults to `<context>/dist`.
  pub path: Option<PathBuf>,
  /// Defaults to `[name].js`.
  pub filename: Option<String>,
}

#[derive(Default, Debug, Clone)]
pub struct ModuleOptions {
  pub rules: Vec<ModuleRule>,
}

/// Applies `loaders` to every resource whose absolute path matches `test`.
#[derive(Debug, Clone)]
pub struct ModuleRule {
  pub test: Regex,
  pub loaders: Vec<LoaderItem>,
}

impl ModuleRule {
  pub fn new(test: Regex, loaders: Vec<LoaderItem>) -> Self {
    Self { test, loaders }
  }
}

#[derive(Default, Debug, Clone)]
pub struct ResolveOptions {
  /// Tried in order when a request names no existing file. Defaults to `[".js"]`.
  pub extensions: Option<Vec<String>>,
}
