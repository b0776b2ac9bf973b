use tapack_common::{DEFAULT_ENTRY_NAME, EntryOption, EntryRoot};
use tapack_error::BuildResult;

use crate::{compiler::CompilerHooks, plugin::Plugin, types::EntryOptionArgs};

/// Turns the `entry` option into named roots: a single path becomes `main`, a map yields one
/// root per key in order.
#[derive(Debug, Default)]
pub struct EntryOptionPlugin;

impl Plugin for EntryOptionPlugin {
  fn apply(&self, hooks: &CompilerHooks) -> BuildResult<()> {
    hooks.entry_option.tap(&*self.name(), |args: &EntryOptionArgs| {
      let roots = match &args.entry {
        EntryOption::Single(request) => vec![EntryRoot {
          name: DEFAULT_ENTRY_NAME.into(),
          request: request.clone(),
          context: args.context.clone(),
        }],
        EntryOption::Multiple(entries) => entries
          .iter()
          .map(|(name, request)| EntryRoot {
            name: name.as_str().into(),
            request: request.clone(),
            context: args.context.clone(),
          })
          .collect(),
      };
      Ok(Some(roots))
    });
    Ok(())
  }
}
