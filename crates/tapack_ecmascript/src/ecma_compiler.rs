use arcstr::ArcStr;
use itertools::Itertools;
use oxc::{allocator::Allocator, codegen::Codegen, parser::Parser, span::SourceType};

use crate::ecma_ast::{EcmaAst, ProgramCell, ProgramDependent, ProgramOwner};

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// Fails on any diagnostic. The error lists all of them, one per line.
  pub fn parse(source: impl Into<ArcStr>, source_type: SourceType) -> anyhow::Result<EcmaAst> {
    let owner = ProgramOwner { source: source.into(), allocator: Allocator::default() };
    let program = ProgramCell::try_new(owner, |owner| {
      let ret = Parser::new(&owner.allocator, &owner.source, source_type).parse();
      if ret.panicked || !ret.errors.is_empty() {
        anyhow::bail!("{}", ret.errors.iter().map(ToString::to_string).join("\n"));
      }
      Ok(ProgramDependent { program: ret.program })
    })?;

    Ok(EcmaAst { program, source_type })
  }

  pub fn print(ast: &EcmaAst) -> String {
    Codegen::new().build(ast.program()).code
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prints_what_it_parsed() {
    let ast = EcmaCompiler::parse("const a = require('./a');", SourceType::default()).unwrap();
    assert_eq!(EcmaCompiler::print(&ast), "const a = require(\"./a\");\n");
  }

  #[test]
  fn syntax_error_fails_the_parse() {
    let err = EcmaCompiler::parse("const = ;", SourceType::default()).unwrap_err();
    assert!(!err.to_string().is_empty());
  }
}
