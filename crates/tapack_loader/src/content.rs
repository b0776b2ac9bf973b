use anyhow::Context;

/// Value carried between loaders. Converted at each boundary to what the next loader expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
  Text(String),
  Raw(Vec<u8>),
}

impl Default for Content {
  fn default() -> Self {
    Self::Text(String::new())
  }
}

impl Content {
  pub fn as_bytes(&self) -> &[u8] {
    match self {
      Self::Text(text) => text.as_bytes(),
      Self::Raw(bytes) => bytes,
    }
  }

  pub fn into_bytes(self) -> Vec<u8> {
    match self {
      Self::Text(text) => text.into_bytes(),
      Self::Raw(bytes) => bytes,
    }
  }

  pub fn try_into_text(self) -> anyhow::Result<String> {
    match self {
      Self::Text(text) => Ok(text),
      Self::Raw(bytes) => String::from_utf8(bytes).context("content is not valid utf-8"),
    }
  }

  /// Converts to `Raw` when `raw` is set, to `Text` otherwise.
  pub fn convert(self, raw: bool) -> anyhow::Result<Self> {
    if raw { Ok(Self::Raw(self.into_bytes())) } else { self.try_into_text().map(Self::Text) }
  }
}

impl From<String> for Content {
  fn from(value: String) -> Self {
    Self::Text(value)
  }
}

impl From<&str> for Content {
  fn from(value: &str) -> Self {
    Self::Text(value.to_string())
  }
}

impl From<Vec<u8>> for Content {
  fn from(value: Vec<u8>) -> Self {
    Self::Raw(value)
  }
}

/// What a normal loader receives and returns: the content plus an optional source map and
/// free-form metadata handed to the next loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderOutput {
  pub content: Content,
  pub source_map: Option<String>,
  pub meta: Option<serde_json::Value>,
}

impl LoaderOutput {
  pub fn new(content: impl Into<Content>) -> Self {
    Self { content: content.into(), source_map: None, meta: None }
  }
}

impl From<Content> for LoaderOutput {
  fn from(value: Content) -> Self {
    Self::new(value)
  }
}

impl From<String> for LoaderOutput {
  fn from(value: String) -> Self {
    Self::new(value)
  }
}

impl From<&str> for LoaderOutput {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<Vec<u8>> for LoaderOutput {
  fn from(value: Vec<u8>) -> Self {
    Self::new(value)
  }
}

#[test]
fn convert_between_raw_and_text() {
  assert_eq!(Content::from("a").convert(true).unwrap(), Content::Raw(b"a".to_vec()));
  assert_eq!(Content::from(b"b".to_vec()).convert(false).unwrap(), Content::from("b"));
  assert!(Content::Raw(vec![0xff, 0xfe]).convert(false).is_err());
}
