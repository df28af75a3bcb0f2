//! Names of files and folders.
//!
//! Nodes are addressed by `/`-separated name paths (see
//! [`Tree::find_by_path`](crate::Tree::find_by_path)), so a name must be a
//! single, non-blank path segment.

use crate::error::{TreeError, TreeResult};

/// Validate a file or folder name.
///
/// ```
/// use plotweave_tree::validate_node_name;
///
/// assert!(validate_node_name("Chapter 1.txt").is_ok());
/// assert!(validate_node_name("").is_err());
/// assert!(validate_node_name("Act I/Chapter 1.txt").is_err());
/// ```
pub fn validate_node_name(name: &str) -> TreeResult<()> {
    let reason = if name.trim().is_empty() {
        "name must not be blank"
    } else if name.contains('/') {
        "name must not contain '/'"
    } else if name.chars().any(char::is_control) {
        "name must not contain control characters"
    } else {
        return Ok(());
    };
    Err(TreeError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["Chapter 1.txt", "Characters", "notes", "Épilogue", ".hidden", "a.b.c"] {
            assert!(validate_node_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_blank_names() {
        for name in ["", " ", "\t"] {
            assert!(matches!(
                validate_node_name(name),
                Err(TreeError::InvalidName { .. })
            ));
        }
    }

    #[test]
    fn rejects_slashes_and_control_characters() {
        assert!(validate_node_name("Act I/Ch1").is_err());
        assert!(validate_node_name("/").is_err());
        assert!(validate_node_name("line\nbreak").is_err());
    }
}
