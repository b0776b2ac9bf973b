use tapack_error::BundleError;
use tapack_utils::indexmap::FxIndexMap;

use crate::is_reserved_chunk_name;

/// What to start bundling from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOption {
  /// One request, bundled into the `main` chunk.
  Single(String),
  /// Chunk name to request, in output order.
  Multiple(FxIndexMap<String, String>),
}

impl EntryOption {
  pub fn multiple<K: Into<String>, V: Into<String>>(
    entries: impl IntoIterator<Item = (K, V)>,
  ) -> Self {
    Self::Multiple(entries.into_iter().map(|(name, request)| (name.into(), request.into())).collect())
  }

  pub fn validate(&self) -> Result<(), BundleError> {
    match self {
      Self::Single(request) if request.is_empty() => {
        Err(BundleError::configuration("`entry` must not be an empty path"))
      }
      Self::Single(_) => Ok(()),
      Self::Multiple(entries) if entries.is_empty() => {
        Err(BundleError::configuration("`entry` must name at least one entry"))
      }
      Self::Multiple(entries) => entries.iter().try_for_each(|(name, request)| {
        if name.is_empty() || request.is_empty() {
          return Err(BundleError::configuration(format!(
            "entry `{name}` must have a non-empty name and path"
          )));
        }
        if is_reserved_chunk_name(name) {
          return Err(BundleError::configuration(format!(
            "entry name `{name}` is reserved for shared chunks"
          )));
        }
        Ok(())
      }),
    }
  }
}

impl From<&str> for EntryOption {
  fn from(request: &str) -> Self {
    Self::Single(request.to_string())
  }
}

impl From<String> for EntryOption {
  fn from(request: String) -> Self {
    Self::Single(request)
  }
}

impl TryFrom<serde_json::Value> for EntryOption {
  type Error = BundleError;

  fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
    match value {
      serde_json::Value::String(request) => Ok(Self::Single(request)),
      serde_json::Value::Object(map) => map
        .into_iter()
        .map(|(name, request)| match request {
          serde_json::Value::String(request) => Ok((name, request)),
          other => Err(BundleError::configuration(format!(
            "entry `{name}` must be a path string, got `{other}`"
          ))),
        })
        .collect::<Result<FxIndexMap<_, _>, _>>()
        .map(Self::Multiple),
      other => Err(BundleError::configuration(format!(
        "`entry` must be a path string or a map of name to path, got `{other}`"
      ))),
    }
  }
}
