#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use tapack::{
  BundlerOptions, Compiler, EntryOption, FileSystem, MemoryFileSystem, ModuleOptions,
  ModuleRule, SharedPlugin,
};

pub const CONTEXT: &str = "/project";

pub struct Project {
  pub fs: Arc<MemoryFileSystem>,
  pub options: BundlerOptions,
}

impl Project {
  pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
    let files = files.into_iter().map(|(path, content)| (format!("{CONTEXT}/{path}"), content));
    let fs = Arc::new(MemoryFileSystem::new(files).unwrap());
    let options = BundlerOptions {
      entry: Some(EntryOption::from("./src/index.js")),
      context: Some(CONTEXT.into()),
      ..Default::default()
    };
    Self { fs, options }
  }

  pub fn entry(mut self, entry: impl Into<EntryOption>) -> Self {
    self.options.entry = Some(entry.into());
    self
  }

  pub fn rules(mut self, rules: Vec<ModuleRule>) -> Self {
    self.options.module = Some(ModuleOptions { rules });
    self
  }

  pub fn compiler(&self) -> Compiler {
    self.compiler_with(vec![])
  }

  pub fn compiler_with(&self, plugins: Vec<SharedPlugin>) -> Compiler {
    Compiler::with_plugins(self.options.clone(), Arc::clone(&self.fs) as _, plugins).unwrap()
  }

  /// Reads an emitted file relative to the output directory.
  pub fn output(&self, file: &str) -> String {
    self.read(&Path::new(CONTEXT).join("dist").join(file))
  }

  pub fn read(&self, path: &Path) -> String {
    String::from_utf8(self.fs.read(path).unwrap()).unwrap()
  }

  pub fn has_output(&self, file: &str) -> bool {
    self.fs.is_file(&Path::new(CONTEXT).join("dist").join(file))
  }
}

pub fn entries(pairs: &[(&str, &str)]) -> EntryOption {
  EntryOption::multiple(pairs.iter().map(|(name, request)| (*name, *request)))
}
