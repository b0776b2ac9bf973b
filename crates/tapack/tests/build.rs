mod common;

use std::sync::{Arc, Mutex};

use common::{Project, entries};
use pretty_assertions::assert_eq;
use tapack::{FileSystem, ModuleId, SharedCompilation};

fn chunk_names(stats: &tapack::Stats) -> Vec<&str> {
  stats.chunks.iter().map(|chunk| chunk.name.as_str()).collect()
}

fn registers(code: &str, id: &str) -> bool {
  code.contains(&format!("\"{id}\": (module, exports, __tapack_require__) => {{"))
}

#[tokio::test(flavor = "multi_thread")]
async fn module_both_required_and_imported_moves_to_commons() {
  let project = Project::new([
    (
      "src/index.js",
      "const a = require(\"./a\");\nimport(/* webpackChunkName: \"a\" */ \"./a\").then(console.log);\n",
    ),
    ("src/a.js", "module.exports = \"a\";\n"),
  ]);
  let stats = project.compiler().run().await.unwrap();

  assert_eq!(chunk_names(&stats), ["main", "a", "commons"]);
  assert_eq!(stats.chunk("commons").unwrap().modules, ["./src/a.js"]);
  assert!(stats.chunk("a").unwrap().modules.is_empty());
  assert!(stats.chunk("a").unwrap().is_async);
  assert_eq!(stats.module("./src/a.js").unwrap().names, ["commons"]);

  let main = project.output("main.js");
  assert!(main.contains("__tapack_require__(\"./src/a.js\")"));
  assert!(main.contains(
    "__tapack_require__.e(\"a\").then(__tapack_require__.bind(null, \"./src/a.js\"))"
  ));
  assert!(main.contains(r#"var __tapack_chunk_files__ = {"a": "a.js", "commons": "commons.js"};"#));
  assert!(main.ends_with(
    "Promise.all([\"commons\"].map(__tapack_require__.e)).then(() => __tapack_require__(\"./src/index.js\"));\n})();\n"
  ));
  assert!(!registers(&main, "./src/a.js"));

  assert!(registers(&project.output("commons.js"), "./src/a.js"));
  assert!(project.has_output("a.js"));
  assert!(!registers(&project.output("a.js"), "./src/a.js"));
}

#[tokio::test(flavor = "multi_thread")]
async fn module_shared_by_entries_moves_to_commons() {
  let project = Project::new([
    ("src/entry1.js", "const util = require(\"./util\");\nconsole.log(util, 1);\n"),
    ("src/entry2.js", "const util = require(\"./util\");\nconsole.log(util, 2);\n"),
    ("src/util.js", "module.exports = \"util\";\n"),
  ])
  .entry(entries(&[("entry1", "./src/entry1.js"), ("entry2", "./src/entry2.js")]));
  let stats = project.compiler().run().await.unwrap();

  assert_eq!(chunk_names(&stats), ["entry1", "entry2", "commons"]);
  assert_eq!(stats.module("./src/util.js").unwrap().names, ["commons"]);
  assert_eq!(stats.module("./src/entry1.js").unwrap().names, ["entry1"]);
  assert_eq!(stats.chunk("entry1").unwrap().modules, ["./src/entry1.js"]);
  assert_eq!(stats.chunk("entry2").unwrap().modules, ["./src/entry2.js"]);

  for entry in ["entry1.js", "entry2.js"] {
    let code = project.output(entry);
    assert!(!registers(&code, "./src/util.js"), "{entry} should not carry util");
    assert!(code.contains("Promise.all([\"commons\"].map(__tapack_require__.e))"));
  }
  assert!(registers(&project.output("commons.js"), "./src/util.js"));
}

#[tokio::test(flavor = "multi_thread")]
async fn node_modules_go_to_vendors_before_commons() {
  let project = Project::new([
    ("src/main.js", "require(\"lodash\");\nrequire(\"./shared\");\n"),
    ("src/admin.js", "require(\"lodash\");\nrequire(\"./shared\");\n"),
    ("src/shared.js", "module.exports = 1;\n"),
    ("node_modules/lodash/index.js", "module.exports = {};\n"),
  ])
  .entry(entries(&[("main", "./src/main.js"), ("admin", "./src/admin.js")]));
  let stats = project.compiler().run().await.unwrap();

  assert_eq!(chunk_names(&stats), ["main", "admin", "vendors", "commons"]);
  assert_eq!(stats.chunk("vendors").unwrap().modules, ["./node_modules/lodash/index.js"]);
  assert_eq!(stats.chunk("commons").unwrap().modules, ["./src/shared.js"]);
  assert!(project.output("main.js").contains(
    "Promise.all([\"commons\", \"vendors\"].map(__tapack_require__.e)).then(() => __tapack_require__(\"./src/main.js\"));"
  ));
}

#[tokio::test(flavor = "multi_thread")]
async fn vendor_used_by_one_entry_still_leaves_the_entry() {
  let project = Project::new([
    ("src/index.js", "require(\"lodash\");\n"),
    ("node_modules/lodash/index.js", "module.exports = {};\n"),
  ]);
  let stats = project.compiler().run().await.unwrap();

  assert_eq!(chunk_names(&stats), ["main", "vendors"]);
  assert_eq!(stats.chunk("main").unwrap().modules, ["./src/index.js"]);
  assert!(stats.chunk("commons").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn each_module_is_built_once() {
  let project = Project::new([
    ("src/index.js", "require(\"./a\");\nrequire(\"./b\");\nrequire(\"./c\");\n"),
    ("src/a.js", "require(\"./b\");\nrequire(\"./c\");\n"),
    ("src/b.js", "require(\"./c\");\nrequire(\"./a\");\nimport(\"./c\");\n"),
    ("src/c.js", "require(\"./a\");\nrequire(\"./index\");\n"),
  ]);
  let compiler = project.compiler();
  let built = Arc::new(Mutex::new(Vec::<ModuleId>::new()));
  let log = Arc::clone(&built);
  compiler.hooks.this_compilation.tap("count", move |compilation: &SharedCompilation| {
    let log = Arc::clone(&log);
    compilation.hooks.build_module.tap("count", move |id: &ModuleId| {
      log.lock().unwrap().push(id.clone());
      Ok(())
    });
    Ok(())
  });

  let stats = compiler.run().await.unwrap();

  let mut built = built.lock().unwrap().iter().map(ToString::to_string).collect::<Vec<_>>();
  built.sort();
  assert_eq!(built, ["./src/a.js", "./src/b.js", "./src/c.js", "./src/index.js"]);
  assert_eq!(stats.modules.len(), 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn dynamic_imports_with_the_same_name_share_a_chunk() {
  let project = Project::new([
    (
      "src/index.js",
      "import(/* webpackChunkName: \"lazy\" */ \"./x\");\nimport(/* webpackChunkName: \"lazy\" */ \"./y\");\nimport(\"./z\");\n",
    ),
    ("src/x.js", "module.exports = \"x\";\n"),
    ("src/y.js", "module.exports = \"y\";\n"),
    ("src/z.js", "module.exports = \"z\";\n"),
  ]);
  let stats = project.compiler().run().await.unwrap();

  assert_eq!(chunk_names(&stats), ["main", "0", "lazy"]);
  assert_eq!(stats.chunk("lazy").unwrap().modules, ["./src/x.js", "./src/y.js"]);
  assert_eq!(stats.chunk("0").unwrap().modules, ["./src/z.js"]);
  let main = project.output("main.js");
  assert!(main.contains("__tapack_require__.e(\"0\").then(__tapack_require__.bind(null, \"./src/z.js\"))"));
  assert!(main.contains(r#"var __tapack_chunk_files__ = {"0": "0.js", "lazy": "lazy.js"};"#));
  assert!(main.ends_with("__tapack_require__(\"./src/index.js\");\n})();\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unnamed_imports_in_different_modules_get_their_own_chunks() {
  let project = Project::new([
    ("src/index.js", "require(\"./a\");\nrequire(\"./b\");\n"),
    ("src/a.js", "import(\"./lazy_a\");\n"),
    ("src/b.js", "import(\"./lazy_b\");\n"),
    ("src/lazy_a.js", "module.exports = \"a\";\n"),
    ("src/lazy_b.js", "module.exports = \"b\";\n"),
  ]);
  let stats = project.compiler().run().await.unwrap();

  assert_eq!(chunk_names(&stats), ["main", "0", "1"]);
  assert_eq!(stats.chunk("0").unwrap().modules, ["./src/lazy_a.js"]);
  assert_eq!(stats.chunk("1").unwrap().modules, ["./src/lazy_b.js"]);
  let main = project.output("main.js");
  assert!(main.contains("__tapack_require__.e(\"0\").then(__tapack_require__.bind(null, \"./src/lazy_a.js\"))"));
  assert!(main.contains("__tapack_require__.e(\"1\").then(__tapack_require__.bind(null, \"./src/lazy_b.js\"))"));
  assert!(!main.contains("synthetic"));
}

#[tokio::test(flavor = "multi_thread")]
async fn nested_dynamic_imports_keep_their_own_chunk() {
  let project = Project::new([
    ("src/index.js", "import(/* webpackChunkName: \"page\" */ \"./page\");\n"),
    ("src/page.js", "require(\"./widget\");\nimport(/* webpackChunkName: \"modal\" */ \"./modal\");\n"),
    ("src/widget.js", "module.exports = 1;\n"),
    ("src/modal.js", "module.exports = 2;\n"),
  ]);
  let stats = project.compiler().run().await.unwrap();

  assert_eq!(chunk_names(&stats), ["main", "modal", "page"]);
  assert_eq!(stats.chunk("page").unwrap().modules, ["./src/page.js", "./src/widget.js"]);
  assert_eq!(stats.chunk("modal").unwrap().modules, ["./src/modal.js"]);
  assert!(project.output("page.js").contains("__tapack_require__.e(\"modal\")"));
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_builds_are_identical() {
  let project = Project::new([
    ("src/main.js", "require(\"./a\");\nrequire(\"./b\");\nimport(\"./lazy\");\n"),
    ("src/admin.js", "require(\"./b\");\nrequire(\"./a\");\n"),
    ("src/a.js", "require(\"./c\");\n"),
    ("src/b.js", "require(\"./c\");\nrequire(\"lib\");\n"),
    ("src/c.js", "module.exports = \"c\";\n"),
    ("src/lazy.js", "require(\"./c\");\n"),
    ("node_modules/lib/index.js", "module.exports = \"lib\";\n"),
  ])
  .entry(entries(&[("main", "./src/main.js"), ("admin", "./src/admin.js")]));
  let compiler = project.compiler();

  let first = compiler.run().await.unwrap();
  let first_outputs =
    first.assets.iter().map(|asset| project.output(&asset.filename)).collect::<Vec<_>>();
  let second = compiler.run().await.unwrap();
  let second_outputs =
    second.assets.iter().map(|asset| project.output(&asset.filename)).collect::<Vec<_>>();

  assert_eq!(first, second);
  assert_eq!(first_outputs, second_outputs);
  assert_eq!(first.to_json().unwrap(), project.compiler().run().await.unwrap().to_json().unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn stats_describe_the_build() {
  let project = Project::new([
    ("src/index.js", "require(\"./a\");\n"),
    ("src/a.js", "module.exports = 1;\n"),
  ]);
  let stats = project.compiler().run().await.unwrap();

  assert_eq!(stats.entries.len(), 1);
  assert_eq!(stats.entries[0].name, "main");
  assert_eq!(stats.entries[0].module_id, "./src/index.js");
  assert_eq!(
    stats.modules.iter().map(|module| module.id.as_str()).collect::<Vec<_>>(),
    ["./src/a.js", "./src/index.js"]
  );
  assert_eq!(stats.module("./src/a.js").unwrap().resource, "/project/src/a.js");
  assert_eq!(stats.chunk("main").unwrap().files, ["main.js"]);
  assert_eq!(stats.assets.len(), 1);
  assert_eq!(stats.assets[0].filename, "main.js");
  assert_eq!(stats.assets[0].size, project.output("main.js").len());
  assert_eq!(stats.file_dependencies, ["/project/src/a.js", "/project/src/index.js"]);

  let json = serde_json::from_str::<serde_json::Value>(&stats.to_json().unwrap()).unwrap();
  assert_eq!(json["entries"][0]["moduleId"], "./src/index.js");
}

#[tokio::test(flavor = "multi_thread")]
async fn filename_template_places_chunks() {
  let mut project = Project::new([
    ("src/index.js", "import(/* webpackChunkName: \"lazy page\" */ \"./page\");\n"),
    ("src/page.js", "module.exports = 1;\n"),
  ]);
  project.options.output = Some(tapack::OutputOptions {
    path: Some("build".into()),
    filename: Some("js/[name].bundle.js".into()),
  });
  let stats = project.compiler().run().await.unwrap();

  let files = stats.assets.iter().map(|asset| asset.filename.as_str()).collect::<Vec<_>>();
  assert_eq!(files, ["js/main.bundle.js", "js/lazy_page.bundle.js"]);
  let main = project.read("/project/build/js/main.bundle.js".as_ref());
  assert!(main.contains(r#"{"lazy page": "js/lazy_page.bundle.js"}"#));
  assert!(project.fs.is_file("/project/build/js/lazy_page.bundle.js".as_ref()));
}

#[tokio::test(flavor = "multi_thread")]
async fn writes_bundles_to_disk() {
  let dir = tempfile::tempdir().unwrap();
  let src = dir.path().join("src");
  std::fs::create_dir_all(&src).unwrap();
  std::fs::write(src.join("index.js"), "const a = require(\"./a\");\nconsole.log(a);\n").unwrap();
  std::fs::write(src.join("a.js"), "module.exports = \"a\";\n").unwrap();

  let options = tapack::BundlerOptions {
    entry: Some(tapack::EntryOption::from("./src/index.js")),
    context: Some(dir.path().to_path_buf()),
    ..Default::default()
  };
  let compiler = tapack::Compiler::new(options, Arc::new(tapack::OsFileSystem)).unwrap();
  let stats = compiler.run().await.unwrap();

  let main = std::fs::read_to_string(dir.path().join("dist").join("main.js")).unwrap();
  assert_eq!(stats.assets[0].size, main.len());
  assert!(registers(&main, "./src/a.js"));
  assert!(registers(&main, "./src/index.js"));
}
