use std::{path::Path, sync::LazyLock};

use arcstr::ArcStr;
use oxc::{
  allocator::Allocator,
  ast::ast::{self, Argument},
  ast_visit::{VisitMut, walk_mut},
  span::{GetSpan, Span},
};
use regex::Regex;
use tapack_common::{
  AsyncBlock, DependencyDescriptor, ModuleId, REQUIRE_FN_NAME, SYNTHETIC_CHUNK_PREFIX,
  is_reserved_chunk_name,
};
use tapack_ecmascript::AstSnippet;
use tapack_error::BundleError;
use tapack_resolver::{ResolveReturn, Resolver};
use tapack_utils::path_ext::PathExt;

static CHUNK_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?:webpack|tapack)?[cC]hunkName\s*:\s*['"]([^'"]+)['"]"#).unwrap()
});

#[derive(Debug, Default)]
pub struct ScanResult {
  pub dependencies: Vec<DependencyDescriptor>,
  pub blocks: Vec<AsyncBlock>,
  pub errors: Vec<anyhow::Error>,
}

/// Rewrites `require("x")` and `import("x")` to module ids, collecting what they point at.
pub struct DependencyScanner<'me, 'ast> {
  snippet: AstSnippet<'ast>,
  source: &'me str,
  comments: Vec<Span>,
  resolver: &'me Resolver,
  importer: &'me Path,
  chunk_name: &'me ArcStr,
  result: ScanResult,
}

impl<'me, 'ast> DependencyScanner<'me, 'ast> {
  pub fn new(
    allocator: &'ast Allocator,
    source: &'me str,
    comments: Vec<Span>,
    resolver: &'me Resolver,
    importer: &'me Path,
    chunk_name: &'me ArcStr,
  ) -> Self {
    Self {
      snippet: AstSnippet::new(allocator, REQUIRE_FN_NAME),
      source,
      comments,
      resolver,
      importer,
      chunk_name,
      result: ScanResult::default(),
    }
  }

  pub fn scan(mut self, program: &mut ast::Program<'ast>) -> ScanResult {
    self.visit_program(program);
    self.result
  }

  fn resolve(&mut self, request: &str) -> Option<ResolveReturn> {
    match self.resolver.resolve(Some(self.importer), request) {
      Ok(resolved) => Some(resolved),
      Err(err) => {
        self.result.errors.push(err.into());
        None
      }
    }
  }

  /// `require("x")` => `__tapack_require__("<id of x>")`
  fn rewrite_require(&mut self, call: &mut ast::CallExpression<'ast>) {
    let ast::Expression::Identifier(callee) = &call.callee else {
      return;
    };
    if callee.name.as_str() != "require" || call.arguments.len() != 1 {
      return;
    }
    let Argument::StringLiteral(literal) = &call.arguments[0] else {
      return;
    };
    let (callee_span, literal_span) = (callee.span, literal.span);
    let request = literal.value.to_string();

    let Some(resolved) = self.resolve(&request) else {
      return;
    };
    call.callee = self.snippet.runtime_ref(callee_span);
    call.arguments[0] = self.snippet.module_id_arg(&resolved.id, literal_span);

    self.result.dependencies.push(DependencyDescriptor {
      name: self.chunk_name.clone(),
      context: self.resolver.context().to_path_buf(),
      request,
      resource: resolved.path,
      module_id: ModuleId::new(resolved.id),
    });
  }

  /// `import("x")` => `__tapack_require__.e("<chunk>").then(__tapack_require__.bind(null, "<id of x>"))`
  fn rewrite_dynamic_import(
    &mut self,
    expr: &ast::ImportExpression<'ast>,
  ) -> Option<ast::Expression<'ast>> {
    let ast::Expression::StringLiteral(literal) = &expr.source else {
      return None;
    };
    let request = literal.value.to_string();
    let named = self.chunk_name_between(expr.span.start, expr.source.span().start);
    if let Some(name) = named.as_deref().filter(|name| is_reserved_chunk_name(name)) {
      self.result.errors.push(
        BundleError::configuration(format!(
          "`import(\"{request}\")` in `{}` names its chunk `{name}`, which is reserved for shared modules",
          self.importer.dot_relative_slash(self.resolver.context())
        ))
        .into(),
      );
      return None;
    }
    let resolved = self.resolve(&request)?;
    // Numbered at seal, once every `import()` of the compilation is known.
    let chunk_name =
      named.unwrap_or_else(|| ArcStr::from(format!("{SYNTHETIC_CHUNK_PREFIX}{}", resolved.id)));

    let new_expr = self.snippet.load_chunk_then_require(&chunk_name, &resolved.id, expr.span);

    self.result.blocks.push(AsyncBlock {
      context: self.resolver.context().to_path_buf(),
      request,
      resource: resolved.path,
      module_id: ModuleId::new(resolved.id),
      chunk_name,
      is_async: true,
    });
    Some(new_expr)
  }

  /// Name from a `chunkName: "..."` comment inside `[start, end)`.
  fn chunk_name_between(&self, start: u32, end: u32) -> Option<ArcStr> {
    self.comments.iter().filter(|span| span.start >= start && span.end <= end).find_map(|span| {
      let text = self.source.get(span.start as usize..span.end as usize)?;
      CHUNK_NAME_RE.captures(text).map(|caps| ArcStr::from(&caps[1]))
    })
  }
}

impl<'ast> VisitMut<'ast> for DependencyScanner<'_, 'ast> {
  fn visit_expression(&mut self, expr: &mut ast::Expression<'ast>) {
    match expr {
      ast::Expression::CallExpression(call) => self.rewrite_require(call),
      ast::Expression::ImportExpression(import_expr) => {
        if let Some(new_expr) = self.rewrite_dynamic_import(import_expr) {
          *expr = new_expr;
        }
      }
      _ => {}
    }
    walk_mut::walk_expression(self, expr);
  }
}

#[cfg(test)]
mod tests {
  use std::{path::PathBuf, sync::Arc};

  use oxc::span::SourceType;
  use tapack_ecmascript::EcmaCompiler;
  use tapack_fs::MemoryFileSystem;

  use super::*;

  fn scan(source: &str, files: &[&str]) -> (String, ScanResult) {
    let fs = MemoryFileSystem::new(files.iter().map(|path| (*path, ""))).unwrap();
    let resolver = Resolver::new(PathBuf::from("/project"), vec![".js".into()], Arc::new(fs));
    let importer = PathBuf::from("/project/src/index.js");
    let chunk_name = ArcStr::from("main");

    let mut ast = EcmaCompiler::parse(source, SourceType::default()).unwrap();
    let comments = ast.comment_spans();
    let result = ast.program.with_mut(|fields| {
      DependencyScanner::new(
        fields.allocator,
        fields.source,
        comments,
        &resolver,
        &importer,
        &chunk_name,
      )
      .scan(fields.program)
    });
    (EcmaCompiler::print(&ast), result)
  }

  #[test]
  fn rewrites_require_calls() {
    let (code, result) = scan("const a = require('./a');\n", &["/project/src/a.js"]);
    assert_eq!(code, "const a = __tapack_require__(\"./src/a.js\");\n");
    assert_eq!(result.dependencies.len(), 1);
    assert_eq!(result.dependencies[0].request, "./a");
    assert_eq!(&*result.dependencies[0].module_id, "./src/a.js");
    assert_eq!(result.dependencies[0].name, "main");
  }

  #[test]
  fn ignores_other_calls() {
    let (code, result) =
      scan("foo('./a');\nrequire(name);\nrequire('./a', 1);\n", &["/project/src/a.js"]);
    assert_eq!(code, "foo(\"./a\");\nrequire(name);\nrequire(\"./a\", 1);\n");
    assert!(result.dependencies.is_empty());
    assert!(result.errors.is_empty());
  }

  #[test]
  fn dynamic_import_uses_the_chunk_name_comment() {
    let (code, result) =
      scan("import(/* webpackChunkName: 'title' */ './a');\n", &["/project/src/a.js"]);
    assert!(code.contains(
      "__tapack_require__.e(\"title\").then(__tapack_require__.bind(null, \"./src/a.js\"))"
    ));
    assert_eq!(result.blocks.len(), 1);
    assert_eq!(result.blocks[0].chunk_name, "title");
    assert!(result.blocks[0].is_async);
  }

  #[test]
  fn unnamed_dynamic_imports_wait_for_a_number() {
    let (_, result) = scan(
      "import('./a');\nimport(/* chunkName: \"b\" */ './b');\nimport('./c');\n",
      &["/project/src/a.js", "/project/src/b.js", "/project/src/c.js"],
    );
    let names = result.blocks.iter().map(|block| block.chunk_name.to_string()).collect::<Vec<_>>();
    assert_eq!(names, [
      format!("{SYNTHETIC_CHUNK_PREFIX}./src/a.js"),
      "b".to_string(),
      format!("{SYNTHETIC_CHUNK_PREFIX}./src/c.js"),
    ]);
    assert!(tapack_common::is_synthetic_chunk_name(&result.blocks[0].chunk_name));
  }

  #[test]
  fn shared_chunk_names_cannot_be_requested() {
    let (code, result) =
      scan("import(/* webpackChunkName: \"vendors\" */ './a');\n", &["/project/src/a.js"]);
    assert!(result.blocks.is_empty());
    assert!(code.contains("import("));
    assert_eq!(result.errors.len(), 1);
    let err = result.errors[0].downcast_ref::<BundleError>().unwrap();
    assert!(matches!(err, BundleError::Configuration { .. }));
    assert!(err.to_string().contains("`vendors`"));
  }

  #[test]
  fn resolution_errors_are_collected() {
    let (_, result) = scan("require('./missing');\nimport('./gone');\n", &[]);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors[0].to_string().contains("./missing"));
  }

  #[test]
  fn nested_requires_are_rewritten_in_order() {
    let (code, result) =
      scan("f(require('./a'), () => require('./b'));\n", &["/project/src/a.js", "/project/src/b.js"]);
    assert!(code.contains("__tapack_require__(\"./src/b.js\")"));
    let ids = result.dependencies.iter().map(|dep| dep.module_id.to_string()).collect::<Vec<_>>();
    assert_eq!(ids, ["./src/a.js", "./src/b.js"]);
  }
}
