mod bundle_error;

use std::ops::{Deref, DerefMut};

pub use crate::bundle_error::BundleError;

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  /// Iterates over the errors that carry a typed [`BundleError`].
  pub fn bundle_errors(&self) -> impl Iterator<Item = &BundleError> {
    self.0.iter().filter_map(|err| err.downcast_ref::<BundleError>())
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (i, err) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{err:#}")?;
    }
    Ok(())
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<BundleError> for BuildError {
  fn from(error: BundleError) -> Self {
    Self(vec![error.into()])
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn bundle_errors_are_recoverable_from_the_aggregate() {
  let err = BuildError::from(vec![
    anyhow::anyhow!("plain"),
    BundleError::Resolution { importer: "./src/index.js".into(), request: "./missing".into() }
      .into(),
  ]);

  let kinds = err.bundle_errors().collect::<Vec<_>>();
  assert_eq!(kinds.len(), 1);
  assert!(matches!(kinds[0], BundleError::Resolution { request, .. } if request == "./missing"));
  assert_eq!(
    err.to_string(),
    "plain\nModule not found: Can't resolve './missing' in './src/index.js'"
  );
}
