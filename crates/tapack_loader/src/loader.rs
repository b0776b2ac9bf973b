use std::{borrow::Cow, sync::Arc};

use tapack_utils::pretty_type_name::pretty_type_name;

use crate::{LoaderContext, LoaderOutput};

/// Per-loader scratch space, shared between the pitch and the normal call of one loader.
pub type LoaderData = serde_json::Map<String, serde_json::Value>;

/// A content transform.
///
/// Both phases complete synchronously by returning. To complete later, call
/// [`LoaderContext::async_callback`] and deliver the result through the returned callback; the
/// value returned synchronously is then ignored.
pub trait Loader: Send + Sync {
  fn name(&self) -> Cow<'static, str> {
    pretty_type_name::<Self>()
  }

  /// Whether [`Loader::normal`] expects [`crate::Content::Raw`] instead of text.
  fn raw(&self) -> bool {
    false
  }

  /// Runs before any normal phase. Returning `Some` skips the rest of the chain and the resource
  /// read, handing the value to the normal phase of the previous loader.
  fn pitch(
    &self,
    _ctx: &mut LoaderContext<'_>,
    _remaining_request: &str,
    _previous_request: &str,
    _data: &mut LoaderData,
  ) -> anyhow::Result<Option<LoaderOutput>> {
    Ok(None)
  }

  fn normal(
    &self,
    ctx: &mut LoaderContext<'_>,
    input: LoaderOutput,
    data: &mut LoaderData,
  ) -> anyhow::Result<LoaderOutput>;
}

/// A configured loader: the request string it is known by (`path?query#fragment`) and its
/// implementation.
#[derive(Clone)]
pub struct LoaderItem {
  pub request: String,
  pub loader: Arc<dyn Loader>,
}

impl LoaderItem {
  pub fn new(request: impl Into<String>, loader: Arc<dyn Loader>) -> Self {
    Self { request: request.into(), loader }
  }

  /// Uses the loader's name as its request.
  pub fn from_loader(loader: Arc<dyn Loader>) -> Self {
    Self { request: loader.name().into_owned(), loader }
  }
}

impl std::fmt::Debug for LoaderItem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LoaderItem").field("request", &self.request).finish_non_exhaustive()
  }
}
