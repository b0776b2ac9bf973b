/// The fatal error kinds a build can stop on.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
  #[error("Invalid configuration: {message}")]
  Configuration { message: String },
  #[error("Module not found: Can't resolve '{request}' in '{importer}'")]
  Resolution { importer: String, request: String },
  #[error("Loader '{loader}' failed while processing '{resource}': {source}")]
  Transform {
    loader: String,
    resource: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
  },
  #[error("Failed to parse '{resource}': {message}")]
  Parse { resource: String, message: String },
}

impl BundleError {
  pub fn configuration(message: impl Into<String>) -> Self {
    Self::Configuration { message: message.into() }
  }

  pub fn transform(
    loader: impl Into<String>,
    resource: impl Into<String>,
    source: anyhow::Error,
  ) -> Self {
    Self::Transform { loader: loader.into(), resource: resource.into(), source: source.into() }
  }
}
