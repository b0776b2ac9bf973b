use oxc::{
  allocator::Allocator,
  ast::{
    AstBuilder, NONE,
    ast::{Argument, Expression},
  },
  span::{Atom, SPAN, Span},
};

/// Builds the runtime calls that `require()` and `import()` sites are rewritten to.
pub struct AstSnippet<'ast> {
  builder: AstBuilder<'ast>,
  runtime: Atom<'ast>,
}

impl<'ast> AstSnippet<'ast> {
  /// `runtime` is the name of the require function the bundle defines.
  pub fn new(alloc: &'ast Allocator, runtime: &str) -> Self {
    let builder = AstBuilder::new(alloc);
    Self { runtime: builder.atom(runtime), builder }
  }

  /// The require function itself, keeping `span` for diagnostics.
  pub fn runtime_ref(&self, span: Span) -> Expression<'ast> {
    self.builder.expression_identifier(span, self.runtime)
  }

  pub fn module_id_arg(&self, module_id: &str, span: Span) -> Argument<'ast> {
    Argument::StringLiteral(self.builder.alloc_string_literal(
      span,
      self.builder.atom(module_id),
      None,
    ))
  }

  /// `<runtime>.e("<chunk>").then(<runtime>.bind(null, "<module id>"))`
  pub fn load_chunk_then_require(
    &self,
    chunk_name: &str,
    module_id: &str,
    span: Span,
  ) -> Expression<'ast> {
    let load_chunk =
      self.member_call(self.runtime_ref(SPAN), "e", [self.module_id_arg(chunk_name, SPAN)], SPAN);
    let null = Argument::from(self.builder.expression_null_literal(SPAN));
    let bound_require = self.member_call(
      self.runtime_ref(SPAN),
      "bind",
      [null, self.module_id_arg(module_id, SPAN)],
      SPAN,
    );
    self.member_call(load_chunk, "then", [Argument::from(bound_require)], span)
  }

  fn member_call<const N: usize>(
    &self,
    object: Expression<'ast>,
    method: &str,
    args: [Argument<'ast>; N],
    span: Span,
  ) -> Expression<'ast> {
    let callee = Expression::StaticMemberExpression(self.builder.alloc_static_member_expression(
      SPAN,
      object,
      self.builder.identifier_name(SPAN, self.builder.atom(method)),
      false,
    ));
    let mut arguments = self.builder.vec_with_capacity(N);
    for arg in args {
      arguments.push(arg);
    }
    self.builder.expression_call(span, callee, NONE, arguments, false)
  }
}

#[cfg(test)]
mod tests {
  use oxc::{ast::ast::Statement, span::SourceType};

  use super::*;
  use crate::EcmaCompiler;

  #[test]
  fn builds_chunk_load_followed_by_require() {
    let mut ast = EcmaCompiler::parse("x;", SourceType::default()).unwrap();
    ast.program.with_mut(|fields| {
      let snippet = AstSnippet::new(fields.allocator, "r");
      let expr = snippet.load_chunk_then_require("a", "./a.js", SPAN);
      if let Statement::ExpressionStatement(stmt) = &mut fields.program.body[0] {
        stmt.expression = expr;
      }
    });

    assert_eq!(EcmaCompiler::print(&ast), "r.e(\"a\").then(r.bind(null, \"./a.js\"));\n");
  }
}
