use arcstr::ArcStr;
use tapack_error::BuildResult;

use crate::{
  HookKind,
  tap::{TapList, impl_hook_common},
};

type SyncTapFn<A> = dyn Fn(&A) -> BuildResult<()> + Send + Sync;

/// Runs every tap in registration order. The first error aborts the call.
pub struct SyncHook<A> {
  inner: TapList<SyncTapFn<A>>,
}

impl<A> SyncHook<A> {
  pub fn new(name: &'static str) -> Self {
    Self { inner: TapList::new(name) }
  }

  impl_hook_common!(HookKind::Sync);

  pub fn tap(
    &self,
    name: impl Into<ArcStr>,
    func: impl Fn(&A) -> BuildResult<()> + Send + Sync + 'static,
  ) {
    self.inner.push(name.into(), Box::new(func));
  }

  pub fn call(&self, args: &A) -> BuildResult<()> {
    for tap in self.inner.taps.iter() {
      tracing::trace!(hook = self.inner.name, tap = %tap.name, "call sync tap");
      (tap.func)(args)?;
    }
    Ok(())
  }
}

impl<A> std::fmt::Debug for SyncHook<A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.inner.fmt(f)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn taps_run_in_registration_order() {
    let hook = SyncHook::<u32>::new("compile");
    let calls = Arc::new(Mutex::new(vec![]));
    for name in ["first", "second", "third"] {
      let calls = Arc::clone(&calls);
      hook.tap(name, move |n| {
        calls.lock().unwrap().push(format!("{name}:{n}"));
        Ok(())
      });
    }

    hook.call(&7).unwrap();

    assert_eq!(hook.kind(), HookKind::Sync);
    assert_eq!(hook.len(), 3);
    assert_eq!(*calls.lock().unwrap(), ["first:7", "second:7", "third:7"]);
  }

  #[test]
  fn error_stops_remaining_taps() {
    let hook = SyncHook::<()>::new("compile");
    let reached = Arc::new(Mutex::new(false));
    hook.tap("fails", |()| Err(anyhow::anyhow!("boom").into()));
    let reached_clone = Arc::clone(&reached);
    hook.tap("after", move |()| {
      *reached_clone.lock().unwrap() = true;
      Ok(())
    });

    let err = hook.call(&()).unwrap_err();

    assert_eq!(err[0].to_string(), "boom");
    assert!(!*reached.lock().unwrap());
  }
}
