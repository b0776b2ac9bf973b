use std::path::PathBuf;

use arcstr::ArcStr;

/// A graph root produced by the `entry_option` hook: the chunk name and the request to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRoot {
  pub name: ArcStr,
  pub request: String,
  pub context: PathBuf,
}
