use std::fmt::Write;

use tapack_common::{
  BundleTemplate, ChunkTemplateData, MainTemplateData, REQUIRE_FN_NAME, RenderedModule,
};

/// Global queue async chunks push `[name, modules]` onto.
const CHUNK_QUEUE: &str = "tapackChunk";

/// Bundles modules into a registry of `(module, exports, __tapack_require__)` factories.
/// Entry chunks carry the runtime, other chunks register themselves through a global queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTemplate;

fn js_string(value: &str) -> anyhow::Result<String> {
  Ok(serde_json::to_string(value)?)
}

fn write_registry(out: &mut String, modules: &[RenderedModule]) -> anyhow::Result<()> {
  out.push_str("{\n");
  for module in modules {
    writeln!(out, "{}: (module, exports, {REQUIRE_FN_NAME}) => {{", js_string(&module.id)?)?;
    out.push_str(&module.code);
    if !module.code.ends_with('\n') {
      out.push('\n');
    }
    out.push_str("},\n");
  }
  out.push('}');
  Ok(())
}

impl BundleTemplate for DefaultTemplate {
  fn render_main(&self, data: &MainTemplateData<'_>) -> anyhow::Result<String> {
    let mut out = String::new();
    out.push_str("(() => {\nvar __tapack_modules__ = ");
    write_registry(&mut out, data.modules)?;
    out.push_str(";\n");

    let mut chunk_files = String::from("{");
    for (i, (name, file)) in data.chunk_files.iter().enumerate() {
      if i > 0 {
        chunk_files.push_str(", ");
      }
      write!(chunk_files, "{}: {}", js_string(name)?, js_string(file)?)?;
    }
    chunk_files.push('}');

    write!(
      out,
      r#"var __tapack_module_cache__ = {{}};
function {require}(moduleId) {{
  var cached = __tapack_module_cache__[moduleId];
  if (cached !== undefined) return cached.exports;
  var factory = __tapack_modules__[moduleId];
  if (factory === undefined) throw new Error("Cannot find module '" + moduleId + "'");
  var module = (__tapack_module_cache__[moduleId] = {{ exports: {{}} }});
  factory.call(module.exports, module, module.exports, {require});
  return module.exports;
}}
var __tapack_chunk_files__ = {chunk_files};
var __tapack_installed_chunks__ = {{ {chunk_name}: 0 }};
function __tapack_install_chunk__(data) {{
  var chunkId = data[0], moreModules = data[1];
  for (var moduleId in moreModules) __tapack_modules__[moduleId] = moreModules[moduleId];
  var pending = __tapack_installed_chunks__[chunkId];
  __tapack_installed_chunks__[chunkId] = 0;
  if (pending) pending[0]();
}}
{require}.p = typeof document !== "undefined" && document.currentScript
  ? document.currentScript.src.replace(/[^/]*$/, "")
  : "";
{require}.l = (file, onError) => {{
  if (typeof document !== "undefined") {{
    var script = document.createElement("script");
    script.src = {require}.p + file;
    script.onerror = () => onError(new Error("Loading chunk " + file + " failed"));
    document.head.appendChild(script);
  }} else if (typeof require === "function" && typeof __dirname === "string") {{
    try {{ require(require("path").join(__dirname, file)); }} catch (error) {{ onError(error); }}
  }} else {{
    onError(new Error("No way to load chunk " + file));
  }}
}};
{require}.e = (chunkId) => {{
  var installed = __tapack_installed_chunks__[chunkId];
  if (installed === 0 || !Object.prototype.hasOwnProperty.call(__tapack_chunk_files__, chunkId)) {{
    return Promise.resolve();
  }}
  if (installed) return installed[2];
  var promise = new Promise((resolve, reject) => {{
    installed = __tapack_installed_chunks__[chunkId] = [resolve, reject];
  }});
  installed[2] = promise;
  {require}.l(__tapack_chunk_files__[chunkId], (error) => {{
    if (__tapack_installed_chunks__[chunkId] !== 0) {{
      __tapack_installed_chunks__[chunkId] = undefined;
      installed[1](error);
    }}
  }});
  return promise;
}};
var chunkQueue = (globalThis[{queue}] = globalThis[{queue}] || []);
var parentPush = chunkQueue.push.bind(chunkQueue);
chunkQueue.forEach(__tapack_install_chunk__);
chunkQueue.push = (data) => {{
  parentPush(data);
  __tapack_install_chunk__(data);
}};
"#,
      require = REQUIRE_FN_NAME,
      chunk_files = chunk_files,
      chunk_name = js_string(data.chunk_name)?,
      queue = js_string(CHUNK_QUEUE)?,
    )?;

    let entry_id = js_string(data.entry_id)?;
    if data.deferred_chunks.is_empty() {
      writeln!(out, "{REQUIRE_FN_NAME}({entry_id});")?;
    } else {
      let deferred =
        data.deferred_chunks.iter().map(|name| js_string(name)).collect::<Result<Vec<_>, _>>()?;
      writeln!(
        out,
        "Promise.all([{}].map({REQUIRE_FN_NAME}.e)).then(() => {REQUIRE_FN_NAME}({entry_id}));",
        deferred.join(", ")
      )?;
    }
    out.push_str("})();\n");
    Ok(out)
  }

  fn render_chunk(&self, data: &ChunkTemplateData<'_>) -> anyhow::Result<String> {
    let queue = js_string(CHUNK_QUEUE)?;
    let mut out = String::new();
    writeln!(out, "(globalThis[{queue}] = globalThis[{queue}] || []).push([")?;
    writeln!(out, "{},", js_string(data.chunk_name)?)?;
    write_registry(&mut out, data.modules)?;
    out.push_str("\n]);\n");
    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use arcstr::ArcStr;
  use pretty_assertions::assert_eq;
  use tapack_common::ModuleId;
  use tapack_utils::indexmap::FxIndexMap;

  use super::*;

  fn modules() -> Vec<RenderedModule> {
    vec![RenderedModule { id: ModuleId::from("./src/a.js"), code: "exports.a = 1;\n".into() }]
  }

  #[test]
  fn async_chunk_pushes_onto_the_queue() {
    let code = DefaultTemplate
      .render_chunk(&ChunkTemplateData { chunk_name: "a", modules: &modules() })
      .unwrap();
    assert_eq!(
      code,
      r#"(globalThis["tapackChunk"] = globalThis["tapackChunk"] || []).push([
"a",
{
"./src/a.js": (module, exports, __tapack_require__) => {
exports.a = 1;
},
}
]);
"#
    );
  }

  #[test]
  fn entry_waits_for_deferred_chunks() {
    let mut chunk_files = FxIndexMap::default();
    chunk_files.insert(ArcStr::from("commons"), "commons.js".to_string());
    let entry_id = ModuleId::from("./src/a.js");
    let deferred = [ArcStr::from("commons")];
    let code = DefaultTemplate
      .render_main(&MainTemplateData {
        chunk_name: "main",
        entry_id: &entry_id,
        modules: &modules(),
        deferred_chunks: &deferred,
        chunk_files: &chunk_files,
      })
      .unwrap();

    assert!(code.starts_with("(() => {\nvar __tapack_modules__ = {\n\"./src/a.js\""));
    assert!(code.contains(r#"var __tapack_chunk_files__ = {"commons": "commons.js"};"#));
    assert!(code.contains(r#"var __tapack_installed_chunks__ = { "main": 0 };"#));
    assert!(code.ends_with(
      "Promise.all([\"commons\"].map(__tapack_require__.e)).then(() => __tapack_require__(\"./src/a.js\"));\n})();\n"
    ));
  }

  #[test]
  fn entry_without_deferred_chunks_requires_directly() {
    let entry_id = ModuleId::from("./src/a.js");
    let code = DefaultTemplate
      .render_main(&MainTemplateData {
        chunk_name: "main",
        entry_id: &entry_id,
        modules: &modules(),
        deferred_chunks: &[],
        chunk_files: &FxIndexMap::default(),
      })
      .unwrap();
    assert!(code.contains("var __tapack_chunk_files__ = {};"));
    assert!(code.ends_with("__tapack_require__(\"./src/a.js\");\n})();\n"));
  }
}
