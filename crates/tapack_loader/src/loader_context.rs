use tokio::sync::oneshot;

use crate::LoaderOutput;

pub(crate) type AsyncResult = anyhow::Result<Option<LoaderOutput>>;

/// What a loader sees of the run it takes part in.
pub struct LoaderContext<'a> {
  pub(crate) resource: &'a str,
  pub(crate) resource_path: &'a str,
  pub(crate) resource_query: &'a str,
  pub(crate) resource_fragment: &'a str,
  pub(crate) request: &'a str,
  pub(crate) loader_index: usize,
  pub(crate) dependencies: &'a mut Vec<String>,
  pub(crate) pending: Option<oneshot::Receiver<AsyncResult>>,
}

impl LoaderContext<'_> {
  /// The resource with its query and fragment.
  pub fn resource(&self) -> &str {
    self.resource
  }

  pub fn resource_path(&self) -> &str {
    self.resource_path
  }

  pub fn resource_query(&self) -> &str {
    self.resource_query
  }

  pub fn resource_fragment(&self) -> &str {
    self.resource_fragment
  }

  /// Every loader request and the resource, joined with `!`.
  pub fn request(&self) -> &str {
    self.request
  }

  pub fn loader_index(&self) -> usize {
    self.loader_index
  }

  /// Registers an extra file whose change should trigger a rebuild in watch mode.
  pub fn add_dependency(&mut self, path: impl Into<String>) {
    self.dependencies.push(path.into());
  }

  /// Switches the current call to asynchronous completion. Returns `None` if it already switched.
  pub fn async_callback(&mut self) -> Option<LoaderCallback> {
    if self.pending.is_some() {
      return None;
    }
    let (tx, rx) = oneshot::channel();
    self.pending = Some(rx);
    Some(LoaderCallback { tx })
  }

  pub fn is_async(&self) -> bool {
    self.pending.is_some()
  }
}

/// Delivers the result of a loader call that went asynchronous. Consumed on use, so at most one
/// result is delivered; dropping it without calling is reported as a failure of the loader.
#[derive(Debug)]
pub struct LoaderCallback {
  tx: oneshot::Sender<AsyncResult>,
}

impl LoaderCallback {
  pub fn call(self, result: anyhow::Result<Option<LoaderOutput>>) {
    // The receiver only goes away when the whole run was dropped.
    let _ = self.tx.send(result);
  }

  pub fn finish(self, output: impl Into<LoaderOutput>) {
    self.call(Ok(Some(output.into())));
  }

  /// Completes a pitch without a replacement value.
  pub fn skip(self) {
    self.call(Ok(None));
  }

  pub fn fail(self, error: anyhow::Error) {
    self.call(Err(error));
  }
}
