use arcstr::ArcStr;
use tapack_error::BuildResult;

use crate::{
  HookKind,
  tap::{TapList, impl_hook_common},
};

type BailTapFn<A, R> = dyn Fn(&A) -> BuildResult<Option<R>> + Send + Sync;

/// Runs taps in order until one returns `Some`, which becomes the result of the call.
pub struct SyncBailHook<A, R> {
  inner: TapList<BailTapFn<A, R>>,
}

impl<A, R> SyncBailHook<A, R> {
  pub fn new(name: &'static str) -> Self {
    Self { inner: TapList::new(name) }
  }

  impl_hook_common!(HookKind::Bail);

  pub fn tap(
    &self,
    name: impl Into<ArcStr>,
    func: impl Fn(&A) -> BuildResult<Option<R>> + Send + Sync + 'static,
  ) {
    self.inner.push(name.into(), Box::new(func));
  }

  pub fn call(&self, args: &A) -> BuildResult<Option<R>> {
    for tap in self.inner.taps.iter() {
      tracing::trace!(hook = self.inner.name, tap = %tap.name, "call bail tap");
      if let Some(result) = (tap.func)(args)? {
        return Ok(Some(result));
      }
    }
    Ok(None)
  }
}

impl<A, R> std::fmt::Debug for SyncBailHook<A, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.inner.fmt(f)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use super::*;

  #[test]
  fn first_non_empty_result_wins() {
    let hook = SyncBailHook::<&str, String>::new("entryOption");
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    hook.tap("skip", move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(None)
    });
    let counter = Arc::clone(&calls);
    hook.tap("answer", move |input| {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(Some(input.to_uppercase()))
    });
    let counter = Arc::clone(&calls);
    hook.tap("never", move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(Some("unreachable".to_string()))
    });

    assert_eq!(hook.call(&"main").unwrap().as_deref(), Some("MAIN"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(hook.kind(), HookKind::Bail);
  }

  #[test]
  fn no_answer_is_none() {
    let hook = SyncBailHook::<(), u8>::new("entryOption");
    hook.tap("skip", |()| Ok(None));
    assert!(hook.call(&()).unwrap().is_none());
  }
}
