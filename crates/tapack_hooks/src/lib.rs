//! Typed extension points. Each hook owns an ordered list of named taps and is fired with a
//! fixed argument type per call site.

mod async_parallel_hook;
mod async_series_hook;
mod sync_bail_hook;
mod sync_hook;
mod tap;

pub use crate::{
  async_parallel_hook::AsyncParallelHook, async_series_hook::AsyncSeriesHook,
  sync_bail_hook::SyncBailHook, sync_hook::SyncHook, tap::Tap,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
  Sync,
  Bail,
  AsyncSeries,
  AsyncParallel,
}
