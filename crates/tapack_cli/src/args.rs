use std::path::PathBuf;

use clap::Args;
use tapack::{DEFAULT_ENTRY_NAME, EntryOption};

#[derive(Args)]
pub struct InputArgs {
  /// `name=path`, repeatable. A bare path is the `main` entry.
  #[clap(long, short, required = true, action = clap::ArgAction::Append)]
  pub entry: Vec<String>,

  /// Root of module ids and relative entries. Defaults to the current directory.
  #[clap(long)]
  pub context: Option<PathBuf>,

  #[clap(long, value_delimiter = ',')]
  pub extensions: Option<Vec<String>>,
}

impl InputArgs {
  pub fn entry_option(&self) -> EntryOption {
    match self.entry.as_slice() {
      [single] if !single.contains('=') => EntryOption::from(single.as_str()),
      entries => EntryOption::multiple(entries.iter().map(|entry| {
        entry.split_once('=').unwrap_or((DEFAULT_ENTRY_NAME, entry.as_str()))
      })),
    }
  }
}

#[derive(Args)]
pub struct OutputArgs {
  /// Output directory, relative to the context.
  #[clap(long, short = 'd')]
  pub dir: Option<PathBuf>,

  /// Output file name template, `[name]` is replaced by the chunk name.
  #[clap(long)]
  pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input(entry: &[&str]) -> InputArgs {
    InputArgs {
      entry: entry.iter().map(ToString::to_string).collect(),
      context: None,
      extensions: None,
    }
  }

  #[test]
  fn bare_path_is_a_single_entry() {
    assert!(matches!(
      input(&["./src/index.js"]).entry_option(),
      EntryOption::Single(path) if path == "./src/index.js"
    ));
  }

  #[test]
  fn named_entries_keep_their_order() {
    let EntryOption::Multiple(entries) =
      input(&["admin=./src/admin.js", "./src/index.js"]).entry_option()
    else {
      panic!("expected named entries");
    };
    let entries = entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>();
    assert_eq!(entries, [("admin", "./src/admin.js"), ("main", "./src/index.js")]);
  }
}
