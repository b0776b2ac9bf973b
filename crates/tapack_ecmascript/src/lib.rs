mod ast_snippet;
mod ecma_ast;
mod ecma_compiler;

pub use crate::{
  ast_snippet::AstSnippet,
  ecma_ast::{EcmaAst, WithMutFields},
  ecma_compiler::EcmaCompiler,
};
