use std::path::Path;

use sugar_path::SugarPath;

pub trait PathExt {
  fn expect_to_slash(&self) -> String;

  /// Forward-slash path of `self` relative to `base`, prefixed with `./`.
  fn dot_relative_slash(&self, base: &Path) -> String;

  fn has_extension(&self) -> bool;
}

impl PathExt for Path {
  fn expect_to_slash(&self) -> String {
    self
      .to_slash()
      .unwrap_or_else(|| panic!("Failed to convert {:?} to slash str", self.display()))
      .into_owned()
  }

  fn dot_relative_slash(&self, base: &Path) -> String {
    let relative = self.relative(base);
    let relative = relative.to_slash_lossy();
    if relative.starts_with("../") || relative == ".." {
      relative.into_owned()
    } else {
      format!("./{relative}")
    }
  }

  fn has_extension(&self) -> bool {
    self.extension().is_some()
  }
}

#[test]
fn test_dot_relative_slash() {
  let root = Path::new("/project");
  assert_eq!(Path::new("/project/src/a.js").dot_relative_slash(root), "./src/a.js");
  assert_eq!(Path::new("/project/node_modules/lodash/index.js").dot_relative_slash(root), "./node_modules/lodash/index.js");
  assert_eq!(Path::new("/shared/util.js").dot_relative_slash(root), "../shared/util.js");
}

#[test]
fn test_has_extension() {
  assert!(Path::new("./src/a.js").has_extension());
  assert!(!Path::new("./src/a").has_extension());
  assert!(!Path::new("lodash").has_extension());
}
