use arcstr::ArcStr;

/// `ModuleId` is the unique string identifier for each module.
/// - It is the `./`-prefixed, forward-slash path from the context to the resource.
/// - It is what rewritten `require` calls refer to at runtime, so it must be stable across builds.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn as_arc_str(&self) -> &ArcStr {
    &self.0
  }

  /// Whether the module lives in a `node_modules` directory.
  pub fn is_vendor(&self) -> bool {
    self.0.split('/').any(|segment| segment == "node_modules")
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl std::borrow::Borrow<str> for ModuleId {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

#[test]
fn vendor_detection() {
  assert!(ModuleId::from("./node_modules/lodash/index.js").is_vendor());
  assert!(ModuleId::from("./packages/app/node_modules/react/index.js").is_vendor());
  assert!(!ModuleId::from("./src/node_modules_shim.js").is_vendor());
  assert!(!ModuleId::from("./src/index.js").is_vendor());
}
