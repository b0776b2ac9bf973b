mod dependency_scanner;
mod module_task;
pub mod task_context;

use std::{path::Path, sync::Arc};

use arcstr::ArcStr;
use rustc_hash::FxHashMap;
use tapack_common::{
  EntryPoint, EntryPointKind, EntryRoot, ModuleId, ModuleIdx, ModuleLoaderMsg, ModuleTaskResult,
};
use tapack_error::BuildResult;
use tokio::sync::mpsc::Receiver;

use self::{module_task::ModuleTask, task_context::TaskContext};
use crate::{module_graph::Reservation, types::SharedCompilation};

/// A built module still waiting on the builds it started.
struct PendingModule {
  id: ModuleId,
  outstanding: usize,
}

/// Coordinates module tasks for one compilation. Every spawned task reports back through the
/// channel, and the loader only returns once all of them have.
///
/// A module counts as fully built once every dependency and `import()` target it started
/// building is fully built. Only then does `succeed_module` fire for it.
pub struct ModuleLoader {
  rx: Receiver<ModuleLoaderMsg>,
  remaining: u32,
  shared_context: Arc<TaskContext>,
  compilation: SharedCompilation,
  pending: FxHashMap<ModuleIdx, PendingModule>,
  /// Module whose build started the keyed one.
  started_by: FxHashMap<ModuleIdx, ModuleIdx>,
}

impl ModuleLoader {
  pub fn new(compilation: &SharedCompilation) -> Self {
    // 1024 should be enough for most cases
    // over 1024 pending tasks are insane
    let (tx, rx) = tokio::sync::mpsc::channel(1024);

    let shared_context = Arc::new(TaskContext {
      fs: Arc::clone(&compilation.fs),
      options: Arc::clone(&compilation.options),
      resolver: Arc::clone(&compilation.resolver),
      hooks: Arc::clone(&compilation.hooks),
      tx,
    });

    Self {
      rx,
      remaining: 0,
      shared_context,
      compilation: Arc::clone(compilation),
      pending: FxHashMap::default(),
      started_by: FxHashMap::default(),
    }
  }

  /// Builds every module reachable from `roots`, each root under its own chunk name.
  pub async fn add_entries(mut self, roots: Vec<EntryRoot>) -> BuildResult<()> {
    let mut errors: Vec<anyhow::Error> = vec![];

    for (order, root) in roots.into_iter().enumerate() {
      let resolved = match self.shared_context.resolver.resolve(None, &root.request) {
        Ok(resolved) => resolved,
        Err(err) => {
          errors.push(err.into());
          continue;
        }
      };
      let module_id = ModuleId::new(resolved.id);
      match self.try_spawn_new_task(&module_id, &resolved.path, &root.name, false) {
        Ok(reservation) => self.compilation.module_graph.lock().add_entry_point(EntryPoint {
          name: root.name,
          idx: reservation.idx(),
          module_id,
          kind: EntryPointKind::UserDefined { order },
        }),
        Err(errs) => errors.extend(errs.0),
      }
    }

    while self.remaining > 0 {
      let Some(msg) = self.rx.recv().await else {
        break;
      };

      match msg {
        ModuleLoaderMsg::ModuleDone(task_result) => {
          if let Err(errs) = self.on_module_done(*task_result) {
            errors.extend(errs.0);
          }
          self.remaining -= 1;
        }
        ModuleLoaderMsg::BuildErrors(errs) => {
          errors.extend(errs);
          self.remaining -= 1;
        }
      }
    }

    if !errors.is_empty() {
      Err(errors)?;
    }

    Ok(())
  }

  fn on_module_done(&mut self, task_result: ModuleTaskResult) -> BuildResult<()> {
    let ModuleTaskResult { chunk_name, module, file_dependencies } = task_result;
    let idx = module.idx;
    let module_id = module.id.clone();
    let dependencies = module.dependencies.clone();
    let blocks = module.blocks.clone();

    {
      let mut graph = self.compilation.module_graph.lock();
      graph.store(module);
      graph.file_dependencies.extend(file_dependencies);
    }

    let mut errors = vec![];
    let mut started = vec![];

    for dependency in &dependencies {
      match self.try_spawn_new_task(&dependency.module_id, &dependency.resource, &chunk_name, false)
      {
        Ok(Reservation::Created(child)) => started.push(child),
        Ok(Reservation::Existing(_)) => {}
        Err(errs) => errors.extend(errs.0),
      }
    }

    for block in blocks {
      match self.try_spawn_new_task(&block.module_id, &block.resource, &block.chunk_name, true) {
        Ok(reservation) => {
          if let Reservation::Created(child) = reservation {
            started.push(child);
          }
          self.compilation.module_graph.lock().add_entry_point(EntryPoint {
            name: block.chunk_name,
            idx: reservation.idx(),
            module_id: block.module_id,
            kind: EntryPointKind::DynamicImport,
          });
        }
        Err(errs) => errors.extend(errs.0),
      }
    }

    if started.is_empty() {
      errors.extend(self.finish(idx, module_id));
    } else {
      for child in &started {
        self.started_by.insert(*child, idx);
      }
      self.pending.insert(idx, PendingModule { id: module_id, outstanding: started.len() });
    }

    if !errors.is_empty() {
      Err(errors)?;
    }
    Ok(())
  }

  /// Fires `succeed_module` for `idx`, then for every module that was only waiting on it.
  fn finish(&mut self, idx: ModuleIdx, id: ModuleId) -> Vec<anyhow::Error> {
    let mut errors = vec![];
    let mut next = Some((idx, id));
    while let Some((idx, id)) = next.take() {
      tracing::trace!(%id, "fully built");
      if let Err(errs) = self.shared_context.hooks.succeed_module.call(&id) {
        errors.extend(errs.0);
      }
      let Some(parent) = self.started_by.remove(&idx) else {
        continue;
      };
      if let Some(pending) = self.pending.get_mut(&parent) {
        pending.outstanding -= 1;
        if pending.outstanding == 0 {
          next = self.pending.remove(&parent).map(|pending| (parent, pending.id));
        }
      }
    }
    errors
  }

  fn try_spawn_new_task(
    &mut self,
    module_id: &ModuleId,
    resource: &Path,
    chunk_name: &ArcStr,
    is_async: bool,
  ) -> BuildResult<Reservation> {
    let reservation = self.compilation.module_graph.lock().reserve(module_id, chunk_name)?;
    if let Reservation::Created(idx) = reservation {
      self.remaining += 1;

      let task = ModuleTask::new(
        Arc::clone(&self.shared_context),
        idx,
        chunk_name.clone(),
        module_id.clone(),
        resource.to_path_buf(),
        is_async,
      );

      tokio::spawn(task.run());
    }
    Ok(reservation)
  }
}
