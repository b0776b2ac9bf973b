/// Makes a chunk name safe to use as (part of) an output file name.
pub fn sanitize_file_name(str: &str) -> String {
  let mut sanitized = String::with_capacity(str.len());
  for char in str.chars() {
    if char.is_ascii_alphanumeric() || matches!(char, '-' | '_' | '.') {
      sanitized.push(char);
    } else {
      sanitized.push('_');
    }
  }
  if sanitized.starts_with('.') {
    sanitized.replace_range(..1, "_");
  }
  sanitized
}

#[test]
fn test_sanitize_file_name() {
  assert_eq!(sanitize_file_name("\0+a=Z_0-"), "__a_Z_0-");
  assert_eq!(sanitize_file_name("pages/home"), "pages_home");
  assert_eq!(sanitize_file_name("../escape"), "_._escape");
  assert_eq!(sanitize_file_name("vendors"), "vendors");
}
