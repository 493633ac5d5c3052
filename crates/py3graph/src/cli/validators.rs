//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Validate a package name given on the command line.
///
/// Surrounding whitespace is trimmed. Whether the package exists is checked
/// later, against the graph, and only produces a warning.
pub fn validate_package_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Package name cannot be empty".to_string());
    }

    if s.chars().any(char::is_control) {
        return Err(format!(
            "Package name '{}' contains control characters",
            s.escape_debug()
        ));
    }

    Ok(s.to_string())
}

/// Validate a Graphviz layout engine name.
///
/// Any non-empty word is accepted so that newer Graphviz engines work too.
pub fn validate_layout(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Layout cannot be empty".to_string());
    }

    if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(format!(
            "Invalid layout '{s}'. Expected an engine name such as dot, neato, twopi, circo or fdp"
        ));
    }

    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("zope.interface", "zope.interface")]
    #[case::trimmed("  zope.event ", "zope.event")]
    #[case::extra("zope.foo[test]", "zope.foo[test]")]
    fn test_validate_package_name_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_package_name(input).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("", "empty")]
    #[case::blank("   ", "empty")]
    #[case::newline("zope\nfoo", "control")]
    fn test_validate_package_name_invalid(#[case] input: &str, #[case] expected_error: &str) {
        let err = validate_package_name(input).unwrap_err().to_lowercase();
        assert!(
            err.contains(expected_error),
            "Expected error to contain '{expected_error}', got: '{err}'"
        );
    }

    #[rstest]
    #[case::dot("dot")]
    #[case::neato("neato")]
    #[case::padded(" fdp ")]
    fn test_validate_layout_valid(#[case] input: &str) {
        assert_eq!(validate_layout(input).unwrap(), input.trim());
    }

    #[rstest]
    #[case::empty("")]
    #[case::quote("dot\"")]
    #[case::space("dot neato")]
    fn test_validate_layout_invalid(#[case] input: &str) {
        assert!(validate_layout(input).is_err());
    }
}
