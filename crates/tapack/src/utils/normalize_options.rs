use std::sync::Arc;

use tapack_common::{BundlerOptions, NormalizedBundlerOptions, OutputOptions, SharedTemplate};
use tapack_error::BundleError;

use crate::stages::generate::DefaultTemplate;

pub fn normalize_options(
  raw_options: BundlerOptions,
) -> Result<NormalizedBundlerOptions, BundleError> {
  let context = raw_options
    .context
    .ok_or_else(|| BundleError::configuration("`context` is required"))?;
  if !context.is_absolute() {
    return Err(BundleError::configuration(format!(
      "`context` must be an absolute path, got `{}`",
      context.display()
    )));
  }

  let entry = raw_options.entry.ok_or_else(|| BundleError::configuration("`entry` is required"))?;
  entry.validate()?;

  let OutputOptions { path, filename } = raw_options.output.unwrap_or_default();
  let output_path = path.map_or_else(|| context.join("dist"), |path| context.join(path));
  let filename = filename.unwrap_or_else(|| "[name].js".to_string());
  if filename.is_empty() {
    return Err(BundleError::configuration("`output.filename` must not be empty"));
  }

  let template: SharedTemplate =
    raw_options.template.unwrap_or_else(|| Arc::new(DefaultTemplate));

  Ok(NormalizedBundlerOptions {
    entry,
    context,
    output_path,
    filename: filename.into(),
    template,
    rules: raw_options.module.map(|module| module.rules).unwrap_or_default(),
    extensions: raw_options
      .resolve
      .and_then(|resolve| resolve.extensions)
      .unwrap_or_else(|| vec![".js".to_string()]),
  })
}
