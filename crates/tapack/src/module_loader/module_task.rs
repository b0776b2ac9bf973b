use std::{any::Any, panic::AssertUnwindSafe, path::PathBuf, sync::Arc};

use arcstr::ArcStr;
use futures::FutureExt;
use oxc::span::SourceType;
use sugar_path::SugarPath;
use tapack_common::{Module, ModuleId, ModuleIdx, ModuleLoaderMsg, ModuleTaskResult};
use tapack_ecmascript::EcmaCompiler;
use tapack_error::{BuildResult, BundleError};
use tapack_loader::{RunLoadersOptions, RunLoadersResult, run_loaders};
use tracing::Instrument;

use super::{
  dependency_scanner::{DependencyScanner, ScanResult},
  task_context::TaskContext,
};

/// Builds one module: loaders, parse, dependency rewriting.
pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  idx: ModuleIdx,
  chunk_name: ArcStr,
  id: ModuleId,
  resource: PathBuf,
  is_async: bool,
}

impl ModuleTask {
  pub fn new(
    ctx: Arc<TaskContext>,
    idx: ModuleIdx,
    chunk_name: ArcStr,
    id: ModuleId,
    resource: PathBuf,
    is_async: bool,
  ) -> Self {
    Self { ctx, idx, chunk_name, id, resource, is_async }
  }

  /// Always reports back to the coordinator, even when a loader or a hook tap panics.
  pub async fn run(self) {
    let span = tracing::debug_span!("module_task", id = %self.id, chunk = %self.chunk_name);
    let ctx = Arc::clone(&self.ctx);
    let id = self.id.clone();
    let errors = match AssertUnwindSafe(self.run_inner().instrument(span)).catch_unwind().await {
      Ok(Ok(())) => return,
      Ok(Err(errs)) => errs.0,
      Err(payload) => {
        let message = panic_message(payload.as_ref());
        tracing::error!(%id, reason = message, "module task panicked");
        vec![anyhow::anyhow!("Building `{id}` panicked: {message}")]
      }
    };
    let _ = ctx.tx.send(ModuleLoaderMsg::BuildErrors(errors)).await;
  }

  async fn run_inner(self) -> BuildResult<()> {
    self.ctx.hooks.build_module.call(&self.id)?;
    tracing::debug!(is_async = self.is_async, "build module");

    let resource: ArcStr = self.resource.to_slash_lossy().into_owned().into();
    let loaders = self.ctx.options.loaders_for(&resource);
    let RunLoadersResult { output, resource_buffer, file_dependencies } =
      run_loaders(RunLoadersOptions { resource: &resource, loaders, fs: &*self.ctx.fs }).await?;

    let source = output.content.try_into_text().map_err(|err| BundleError::Parse {
      resource: resource.to_string(),
      message: format!("{err:#}"),
    })?;
    let mut ast = EcmaCompiler::parse(source, SourceType::default()).map_err(|err| {
      BundleError::Parse { resource: resource.to_string(), message: format!("{err:#}") }
    })?;

    let comments = ast.comment_spans();
    let ScanResult { dependencies, blocks, errors } = ast.program.with_mut(|fields| {
      DependencyScanner::new(
        fields.allocator,
        fields.source,
        comments,
        &self.ctx.resolver,
        &self.resource,
        &self.chunk_name,
      )
      .scan(fields.program)
    });
    if !errors.is_empty() {
      Err(errors)?;
    }

    let source = ArcStr::from(EcmaCompiler::print(&ast));
    let module = Module {
      idx: self.idx,
      id: self.id,
      names: Default::default(),
      resource,
      raw_source: resource_buffer,
      source,
      ast,
      dependencies,
      blocks,
    };

    let result = ModuleLoaderMsg::ModuleDone(Box::new(ModuleTaskResult {
      chunk_name: self.chunk_name,
      module,
      file_dependencies,
    }));
    let _ = self.ctx.tx.send(result).await;

    Ok(())
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  payload
    .downcast_ref::<&str>()
    .copied()
    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
    .unwrap_or("unknown panic")
}
