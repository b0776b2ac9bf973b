mod entry_option_plugin;
mod entry_plugin;
mod logging_plugin;

pub use self::{
  entry_option_plugin::EntryOptionPlugin, entry_plugin::EntryPlugin,
  logging_plugin::LoggingPlugin,
};
