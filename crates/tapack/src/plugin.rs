use std::borrow::Cow;

use tapack_error::BuildResult;
use tapack_utils::pretty_type_name::pretty_type_name;

use crate::compiler::CompilerHooks;

/// Extends a compiler by tapping its hooks. Applied once, when the compiler is created.
pub trait Plugin: Send + Sync {
  fn name(&self) -> Cow<'static, str> {
    pretty_type_name::<Self>()
  }

  fn apply(&self, hooks: &CompilerHooks) -> BuildResult<()>;
}
