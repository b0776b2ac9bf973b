use serde::Serialize;

/// Summary of a finished build, handed to the `done` hook and returned from `Compiler::run`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
  pub entries: Vec<StatsEntry>,
  pub modules: Vec<StatsModule>,
  pub chunks: Vec<StatsChunk>,
  pub assets: Vec<StatsAsset>,
  pub file_dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsEntry {
  pub name: String,
  pub module_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsModule {
  pub id: String,
  pub names: Vec<String>,
  pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsChunk {
  pub name: String,
  pub files: Vec<String>,
  pub modules: Vec<String>,
  pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsAsset {
  pub filename: String,
  pub size: usize,
}

impl Stats {
  pub fn chunk(&self, name: &str) -> Option<&StatsChunk> {
    self.chunks.iter().find(|chunk| chunk.name == name)
  }

  pub fn module(&self, id: &str) -> Option<&StatsModule> {
    self.modules.iter().find(|module| module.id == id)
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }
}

#[test]
fn serializes_with_camel_case_keys() {
  let stats = Stats {
    entries: vec![StatsEntry { name: "main".into(), module_id: "./src/index.js".into() }],
    chunks: vec![StatsChunk {
      name: "main".into(),
      files: vec!["main.js".into()],
      modules: vec!["./src/index.js".into()],
      is_async: false,
    }],
    ..Default::default()
  };
  let value = serde_json::to_value(&stats).unwrap();
  assert_eq!(value["entries"][0]["moduleId"], "./src/index.js");
  assert_eq!(value["chunks"][0]["isAsync"], false);
  assert!(value["fileDependencies"].as_array().unwrap().is_empty());
}
