use append_only_vec::AppendOnlyVec;
use arcstr::ArcStr;

pub struct Tap<F: ?Sized> {
  pub name: ArcStr,
  pub func: Box<F>,
}

/// Shared storage of every hook kind. Taps can be added through `&self`, so hooks stay usable
/// behind an `Arc`.
pub(crate) struct TapList<F: ?Sized> {
  pub name: &'static str,
  pub taps: AppendOnlyVec<Tap<F>>,
}

impl<F: ?Sized> TapList<F> {
  pub fn new(name: &'static str) -> Self {
    Self { name, taps: AppendOnlyVec::new() }
  }

  pub fn push(&self, name: ArcStr, func: Box<F>) {
    self.taps.push(Tap { name, func });
  }

  pub fn len(&self) -> usize {
    self.taps.len()
  }

  pub fn tap_names(&self) -> Vec<ArcStr> {
    self.taps.iter().map(|tap| tap.name.clone()).collect()
  }
}

impl<F: ?Sized> std::fmt::Debug for TapList<F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Hook").field("name", &self.name).field("taps", &self.tap_names()).finish()
  }
}

macro_rules! impl_hook_common {
  ($kind:expr) => {
    pub fn name(&self) -> &'static str {
      self.inner.name
    }

    pub fn kind(&self) -> $crate::HookKind {
      $kind
    }

    pub fn len(&self) -> usize {
      self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
      self.inner.len() == 0
    }

    pub fn is_used(&self) -> bool {
      !self.is_empty()
    }

    pub fn tap_names(&self) -> Vec<::arcstr::ArcStr> {
      self.inner.tap_names()
    }
  };
}

pub(crate) use impl_hook_common;
