//! Runs a resource through its loader chain using the two-phase pitch/normal protocol.

mod content;
mod loader;
mod loader_context;
mod loader_object;
mod runner;

pub use crate::{
  content::{Content, LoaderOutput},
  loader::{Loader, LoaderData, LoaderItem},
  loader_context::{LoaderCallback, LoaderContext},
  loader_object::{LoaderObject, parse_path_query_fragment},
  runner::{RESOURCE_READER, RunLoadersOptions, RunLoadersResult, run_loaders},
};
