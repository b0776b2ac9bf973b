use std::future::Future;

use arcstr::ArcStr;
use futures::{FutureExt, future::BoxFuture};
use tapack_error::BuildResult;

use crate::{
  HookKind,
  tap::{TapList, impl_hook_common},
};

pub(crate) type AsyncTapFn<A> = dyn Fn(A) -> BoxFuture<'static, BuildResult<()>> + Send + Sync;

/// Awaits taps strictly one after another. The first failure skips the remaining taps.
pub struct AsyncSeriesHook<A> {
  inner: TapList<AsyncTapFn<A>>,
}

impl<A: Clone + Send + 'static> AsyncSeriesHook<A> {
  pub fn new(name: &'static str) -> Self {
    Self { inner: TapList::new(name) }
  }

  impl_hook_common!(HookKind::AsyncSeries);

  pub fn tap<F, Fut>(&self, name: impl Into<ArcStr>, func: F)
  where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BuildResult<()>> + Send + 'static,
  {
    self.inner.push(name.into(), Box::new(move |args| func(args).boxed()));
  }

  pub async fn call(&self, args: A) -> BuildResult<()> {
    for index in 0..self.inner.len() {
      let tap = &self.inner.taps[index];
      tracing::trace!(hook = self.inner.name, tap = %tap.name, "await series tap");
      (tap.func)(args.clone()).await?;
    }
    Ok(())
  }
}

impl<A> std::fmt::Debug for AsyncSeriesHook<A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.inner.fmt(f)
  }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, time::Duration};

  use tokio::sync::Mutex;

  use super::*;

  #[tokio::test]
  async fn taps_run_one_at_a_time() {
    let hook = AsyncSeriesHook::<Arc<Mutex<Vec<&'static str>>>>::new("emit");
    hook.tap("slow", |log: Arc<Mutex<Vec<&'static str>>>| async move {
      log.lock().await.push("slow:start");
      tokio::time::sleep(Duration::from_millis(20)).await;
      log.lock().await.push("slow:end");
      Ok(())
    });
    hook.tap("fast", |log: Arc<Mutex<Vec<&'static str>>>| async move {
      log.lock().await.push("fast");
      Ok(())
    });

    let log = Arc::new(Mutex::new(vec![]));
    hook.call(Arc::clone(&log)).await.unwrap();

    assert_eq!(hook.kind(), HookKind::AsyncSeries);
    assert_eq!(*log.lock().await, ["slow:start", "slow:end", "fast"]);
  }

  #[tokio::test]
  async fn failure_skips_remaining_taps() {
    let hook = AsyncSeriesHook::<Arc<Mutex<Vec<&'static str>>>>::new("emit");
    hook.tap("fails", |_| async { Err(anyhow::anyhow!("disk full").into()) });
    hook.tap("skipped", |log: Arc<Mutex<Vec<&'static str>>>| async move {
      log.lock().await.push("skipped");
      Ok(())
    });

    let log = Arc::new(Mutex::new(vec![]));
    let err = hook.call(Arc::clone(&log)).await.unwrap_err();

    assert_eq!(err[0].to_string(), "disk full");
    assert!(log.lock().await.is_empty());
  }
}
