use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::{Loader, LoaderData, LoaderItem};

static PATH_QUERY_FRAGMENT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([^?#]*)(\?[^#]*)?(#.*)?$").unwrap());

/// Splits `path?query#fragment`. The query keeps its `?` and the fragment its `#`.
pub fn parse_path_query_fragment(request: &str) -> (&str, &str, &str) {
  match PATH_QUERY_FRAGMENT_RE.captures(request) {
    Some(caps) => (
      caps.get(1).map_or("", |m| m.as_str()),
      caps.get(2).map_or("", |m| m.as_str()),
      caps.get(3).map_or("", |m| m.as_str()),
    ),
    None => (request, "", ""),
  }
}

/// Runtime state of one loader during a run.
pub struct LoaderObject {
  pub request: String,
  pub path: String,
  pub query: String,
  pub fragment: String,
  pub loader: Arc<dyn Loader>,
  pub raw: bool,
  pub data: LoaderData,
  pub pitch_executed: bool,
  pub normal_executed: bool,
}

impl LoaderObject {
  pub fn new(item: LoaderItem) -> Self {
    let LoaderItem { request, loader } = item;
    let (path, query, fragment) = parse_path_query_fragment(&request);
    let (path, query, fragment) = (path.to_string(), query.to_string(), fragment.to_string());
    let raw = loader.raw();
    Self {
      request,
      path,
      query,
      fragment,
      loader,
      raw,
      data: LoaderData::new(),
      pitch_executed: false,
      normal_executed: false,
    }
  }
}

#[test]
fn test_parse_path_query_fragment() {
  assert_eq!(parse_path_query_fragment("/src/a.js"), ("/src/a.js", "", ""));
  assert_eq!(parse_path_query_fragment("/src/a.js?raw=1#top"), ("/src/a.js", "?raw=1", "#top"));
  assert_eq!(parse_path_query_fragment("babel-loader#x?y"), ("babel-loader", "", "#x?y"));
  assert_eq!(parse_path_query_fragment(""), ("", "", ""));
}
