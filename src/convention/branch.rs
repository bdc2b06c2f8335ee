//! Branch name rules, a practical subset of `git check-ref-format --branch`

use super::ValidationError;

const FORBIDDEN_CHARS: [char; 7] = ['~', '^', ':', '?', '*', '[', '\\'];

pub fn validate_branch_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyBranchName);
    }

    let invalid = |reason| ValidationError::InvalidBranchName {
        name: name.to_string(),
        reason,
    };

    if name.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }
    if name.chars().any(|c| c.is_control() || FORBIDDEN_CHARS.contains(&c)) {
        return Err(invalid("contains one of ~ ^ : ? * [ \\ or a control character"));
    }
    if name.starts_with('-') {
        return Err(invalid("starts with '-'"));
    }
    if name.contains("..") {
        return Err(invalid("contains '..'"));
    }
    if name.contains("@{") || name == "@" {
        return Err(invalid("contains '@{' or is '@'"));
    }
    if name.ends_with('/') || name.ends_with('.') || name.ends_with(".lock") {
        return Err(invalid("ends with '/', '.' or '.lock'"));
    }
    if name.split('/').any(|part| part.is_empty() || part.starts_with('.')) {
        return Err(invalid("has an empty path component or one starting with '.'"));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_names() {
        for name in ["main", "feature/login", "fix-123", "release/v1.2", "user/alice/spike"] {
            assert_eq!(validate_branch_name(name), Ok(name));
        }
        assert_eq!(validate_branch_name("  padded  "), Ok("padded"));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_branch_name(""), Err(ValidationError::EmptyBranchName));
        assert_eq!(validate_branch_name("   "), Err(ValidationError::EmptyBranchName));
    }

    #[test]
    fn test_rejects_invalid() {
        for name in [
            "has space",
            "-leading",
            "a..b",
            "trailing/",
            "name.lock",
            "what?",
            "tilde~1",
            "a//b",
            ".hidden",
            "feature/.x",
            "at@{1}",
            "@",
            "dot.",
        ] {
            assert!(
                matches!(
                    validate_branch_name(name),
                    Err(ValidationError::InvalidBranchName { .. })
                ),
                "expected '{name}' to be rejected"
            );
        }
    }
}
