use arcstr::ArcStr;

use crate::Module;

pub struct ModuleTaskResult {
  /// Chain the module was built for; its dependencies are reserved under this name.
  pub chunk_name: ArcStr,
  pub module: Module,
  pub file_dependencies: Vec<String>,
}

pub enum ModuleLoaderMsg {
  ModuleDone(Box<ModuleTaskResult>),
  BuildErrors(Vec<anyhow::Error>),
}
