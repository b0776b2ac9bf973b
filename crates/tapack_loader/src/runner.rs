use std::path::Path;

use anyhow::Context;
use itertools::Itertools;
use tapack_error::BundleError;
use tapack_fs::FileSystem;
use tokio::sync::oneshot;

use crate::{
  Content, LoaderContext, LoaderItem, LoaderObject, LoaderOutput,
  loader_context::AsyncResult, loader_object::parse_path_query_fragment,
};

/// Loader name reported when reading the resource itself fails.
pub const RESOURCE_READER: &str = "<resource>";

pub struct RunLoadersOptions<'a> {
  /// Absolute resource path, optionally followed by `?query` and `#fragment`.
  pub resource: &'a str,
  pub loaders: Vec<LoaderItem>,
  pub fs: &'a dyn FileSystem,
}

#[derive(Debug)]
pub struct RunLoadersResult {
  pub output: LoaderOutput,
  /// The content read from disk. `None` when a pitch short-circuited the chain.
  pub resource_buffer: Option<Vec<u8>>,
  /// Files registered by loaders through [`LoaderContext::add_dependency`].
  pub file_dependencies: Vec<String>,
}

pub async fn run_loaders(options: RunLoadersOptions<'_>) -> Result<RunLoadersResult, BundleError> {
  let RunLoadersOptions { resource, loaders, fs } = options;
  LoaderRunner::new(resource, loaders).run(fs).await
}

struct LoaderRunner<'a> {
  resource: &'a str,
  resource_path: &'a str,
  resource_query: &'a str,
  resource_fragment: &'a str,
  request: String,
  loaders: Vec<LoaderObject>,
  file_dependencies: Vec<String>,
}

impl<'a> LoaderRunner<'a> {
  fn new(resource: &'a str, loaders: Vec<LoaderItem>) -> Self {
    let (resource_path, resource_query, resource_fragment) = parse_path_query_fragment(resource);
    let loaders = loaders.into_iter().map(LoaderObject::new).collect_vec();
    let request = loaders
      .iter()
      .map(|loader| loader.request.as_str())
      .chain(std::iter::once(resource))
      .join("!");
    Self {
      resource,
      resource_path,
      resource_query,
      resource_fragment,
      request,
      loaders,
      file_dependencies: vec![],
    }
  }

  async fn run(mut self, fs: &dyn FileSystem) -> Result<RunLoadersResult, BundleError> {
    let mut index = 0;
    while index < self.loaders.len() {
      if self.loaders[index].pitch_executed {
        index += 1;
        continue;
      }
      self.loaders[index].pitch_executed = true;

      if let Some(replacement) = self.pitch_at(index).await? {
        // A short-circuit on the last loader still runs that loader's own normal phase.
        let start = if index + 1 == self.loaders.len() { Some(index) } else { index.checked_sub(1) };
        let output = self.iterate_normal(start, replacement).await?;
        return Ok(RunLoadersResult {
          output,
          resource_buffer: None,
          file_dependencies: self.file_dependencies,
        });
      }
      index += 1;
    }

    let buffer = fs
      .read(Path::new(self.resource_path))
      .with_context(|| format!("failed to read {}", self.resource_path))
      .map_err(|err| BundleError::transform(RESOURCE_READER, self.resource, err))?;

    let start = self.loaders.len().checked_sub(1);
    let output = self.iterate_normal(start, LoaderOutput::new(Content::Raw(buffer.clone()))).await?;
    Ok(RunLoadersResult {
      output,
      resource_buffer: Some(buffer),
      file_dependencies: self.file_dependencies,
    })
  }

  async fn iterate_normal(
    &mut self,
    start: Option<usize>,
    mut carried: LoaderOutput,
  ) -> Result<LoaderOutput, BundleError> {
    let Some(mut index) = start else {
      return Ok(carried);
    };
    loop {
      if !self.loaders[index].normal_executed {
        self.loaders[index].normal_executed = true;
        carried = self.normal_at(index, carried).await?;
      }
      if index == 0 {
        return Ok(carried);
      }
      index -= 1;
    }
  }

  async fn pitch_at(&mut self, index: usize) -> Result<Option<LoaderOutput>, BundleError> {
    let remaining_request = self.loaders[index + 1..]
      .iter()
      .map(|loader| loader.request.as_str())
      .chain(std::iter::once(self.resource))
      .join("!");
    let previous_request = self.loaders[..index].iter().map(|loader| &loader.request).join("!");

    let LoaderObject { loader, data, .. } = &mut self.loaders[index];
    let mut ctx = LoaderContext {
      resource: self.resource,
      resource_path: self.resource_path,
      resource_query: self.resource_query,
      resource_fragment: self.resource_fragment,
      request: &self.request,
      loader_index: index,
      dependencies: &mut self.file_dependencies,
      pending: None,
    };

    tracing::trace!(loader = %loader.name(), resource = self.resource, "pitch");
    let returned = loader.pitch(&mut ctx, &remaining_request, &previous_request, data);
    settle(ctx.pending.take(), returned)
      .await
      .map_err(|err| BundleError::transform(loader.name(), self.resource, err))
  }

  async fn normal_at(
    &mut self,
    index: usize,
    carried: LoaderOutput,
  ) -> Result<LoaderOutput, BundleError> {
    let LoaderObject { loader, data, raw, .. } = &mut self.loaders[index];
    let LoaderOutput { content, source_map, meta } = carried;
    let content = content
      .convert(*raw)
      .map_err(|err| BundleError::transform(loader.name(), self.resource, err))?;

    let mut ctx = LoaderContext {
      resource: self.resource,
      resource_path: self.resource_path,
      resource_query: self.resource_query,
      resource_fragment: self.resource_fragment,
      request: &self.request,
      loader_index: index,
      dependencies: &mut self.file_dependencies,
      pending: None,
    };

    tracing::trace!(loader = %loader.name(), resource = self.resource, "normal");
    let returned = loader.normal(&mut ctx, LoaderOutput { content, source_map, meta }, data);
    let settled = settle(ctx.pending.take(), returned.map(Some)).await.and_then(|output| {
      output.context("the loader completed asynchronously without producing a result")
    });
    settled.map_err(|err| BundleError::transform(loader.name(), self.resource, err))
  }
}

/// Picks the effective result of a loader call: the synchronous return value, or the value sent
/// through the callback once the call switched to async mode.
async fn settle(
  pending: Option<oneshot::Receiver<AsyncResult>>,
  returned: AsyncResult,
) -> AsyncResult {
  match pending {
    None => returned,
    Some(receiver) => {
      // A synchronous error still fails the call; a synchronous value is discarded.
      returned?;
      receiver.await.context("the loader went async but dropped its callback without a result")?
    }
  }
}
