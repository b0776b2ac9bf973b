//! Maps a request written in a module to an absolute resource path and its module id.

mod resolver;

pub use crate::resolver::{NODE_MODULES, ResolveReturn, Resolver, is_relative_request};
