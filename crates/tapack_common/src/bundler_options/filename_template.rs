use tapack_utils::sanitize_file_name::sanitize_file_name;

const NAME_PLACEHOLDER: &str = "[name]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
  template: String,
}

impl FilenameTemplate {
  pub fn new(template: String) -> Self {
    Self { template }
  }

  pub fn template(&self) -> &str {
    &self.template
  }

  pub fn has_name_placeholder(&self) -> bool {
    self.template.contains(NAME_PLACEHOLDER)
  }

  pub fn render(&self, chunk_name: &str) -> String {
    self.template.replace(NAME_PLACEHOLDER, &sanitize_file_name(chunk_name))
  }
}

impl From<String> for FilenameTemplate {
  fn from(template: String) -> Self {
    Self::new(template)
  }
}

#[test]
fn render_replaces_every_placeholder() {
  let template = FilenameTemplate::new("[name]/[name].bundle.js".to_string());
  assert!(template.has_name_placeholder());
  assert_eq!(template.render("main"), "main/main.bundle.js");
  assert_eq!(template.render("pages/home"), "pages_home/pages_home.bundle.js");

  let fixed = FilenameTemplate::new("bundle.js".to_string());
  assert!(!fixed.has_name_placeholder());
  assert_eq!(fixed.render("main"), "bundle.js");
}
