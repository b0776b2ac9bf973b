use std::future::Future;

use arcstr::ArcStr;
use futures::{FutureExt, StreamExt, stream::FuturesUnordered};
use tapack_error::BuildResult;

use crate::{
  HookKind,
  async_series_hook::AsyncTapFn,
  tap::{TapList, impl_hook_common},
};

/// Starts every tap before awaiting any of them. The call resolves once all taps finish, or on
/// the first failure. Taps that are already running are left to complete in the background.
pub struct AsyncParallelHook<A> {
  inner: TapList<AsyncTapFn<A>>,
}

impl<A: Clone + Send + 'static> AsyncParallelHook<A> {
  pub fn new(name: &'static str) -> Self {
    Self { inner: TapList::new(name) }
  }

  impl_hook_common!(HookKind::AsyncParallel);

  pub fn tap<F, Fut>(&self, name: impl Into<ArcStr>, func: F)
  where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BuildResult<()>> + Send + 'static,
  {
    self.inner.push(name.into(), Box::new(move |args| func(args).boxed()));
  }

  pub async fn call(&self, args: A) -> BuildResult<()> {
    let mut running = self
      .inner
      .taps
      .iter()
      .map(|tap| {
        tracing::trace!(hook = self.inner.name, tap = %tap.name, "spawn parallel tap");
        tokio::spawn((tap.func)(args.clone()))
      })
      .collect::<FuturesUnordered<_>>();

    while let Some(joined) = running.next().await {
      joined.map_err(|err| anyhow::anyhow!("{} tap panicked: {err}", self.inner.name))??;
    }
    Ok(())
  }
}

impl<A> std::fmt::Debug for AsyncParallelHook<A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.inner.fmt(f)
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{
      Arc,
      atomic::{AtomicBool, Ordering},
    },
    time::Duration,
  };

  use tokio::sync::Barrier;

  use super::*;

  #[tokio::test]
  async fn taps_run_concurrently() {
    let hook = AsyncParallelHook::<Arc<Barrier>>::new("make");
    for name in ["entry1", "entry2"] {
      hook.tap(name, |barrier: Arc<Barrier>| async move {
        // Deadlocks unless both taps are in flight at the same time.
        barrier.wait().await;
        Ok(())
      });
    }

    let result =
      tokio::time::timeout(Duration::from_secs(5), hook.call(Arc::new(Barrier::new(2)))).await;

    assert!(result.expect("taps should not wait on each other").is_ok());
    assert_eq!(hook.kind(), HookKind::AsyncParallel);
  }

  #[tokio::test]
  async fn failure_does_not_cancel_started_taps() {
    let hook = AsyncParallelHook::<Arc<AtomicBool>>::new("make");
    hook.tap("slow", |finished: Arc<AtomicBool>| async move {
      tokio::time::sleep(Duration::from_millis(30)).await;
      finished.store(true, Ordering::SeqCst);
      Ok(())
    });
    hook.tap("fails", |_| async { Err(anyhow::anyhow!("entry failed").into()) });

    let finished = Arc::new(AtomicBool::new(false));
    let err = hook.call(Arc::clone(&finished)).await.unwrap_err();
    assert_eq!(err[0].to_string(), "entry failed");
    assert!(!finished.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(finished.load(Ordering::SeqCst));
  }
}
