use arcstr::ArcStr;
use oxc::{
  allocator::Allocator,
  ast::ast::Program,
  span::{SourceType, Span},
};
use self_cell::self_cell;

pub struct ProgramOwner {
  pub source: ArcStr,
  pub allocator: Allocator,
}

pub struct ProgramDependent<'cell> {
  pub program: Program<'cell>,
}

self_cell!(
  pub struct ProgramCell {
    owner: ProgramOwner,

    #[covariant]
    dependent: ProgramDependent,
  }
);

/// What a rewriting pass gets: the source for comment lookups, the arena for new nodes and the
/// program.
pub struct WithMutFields<'outer, 'inner> {
  pub source: &'inner ArcStr,
  pub allocator: &'inner Allocator,
  pub program: &'outer mut Program<'inner>,
}

impl ProgramCell {
  pub fn with_mut<'outer, Ret>(
    &'outer mut self,
    func: impl for<'inner> FnOnce(WithMutFields<'outer, 'inner>) -> Ret,
  ) -> Ret {
    self.with_dependent_mut(|owner: &ProgramOwner, dependent: &'outer mut ProgramDependent| {
      func(WithMutFields {
        source: &owner.source,
        allocator: &owner.allocator,
        program: &mut dependent.program,
      })
    })
  }
}

/// A parsed module. Owns its source text and the arena the program lives in, so it can be stored
/// in the module graph and sent between tasks.
pub struct EcmaAst {
  pub program: ProgramCell,
  pub source_type: SourceType,
}

impl EcmaAst {
  pub fn source(&self) -> &ArcStr {
    &self.program.borrow_owner().source
  }

  pub fn program(&self) -> &Program {
    &self.program.borrow_dependent().program
  }

  /// Spans of every comment, in source order.
  pub fn comment_spans(&self) -> Vec<Span> {
    self.program().comments.iter().map(|comment| comment.span).collect()
  }
}

impl std::fmt::Debug for EcmaAst {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EcmaAst").field("source", self.source()).finish_non_exhaustive()
  }
}

// The program only points into the allocator and source owned by the same cell.
unsafe impl Send for EcmaAst {}
unsafe impl Sync for EcmaAst {}
