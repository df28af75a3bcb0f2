//! Names for story branches.
//!
//! A branch name is typed as one command-line word and may group related
//! drafts with `/`, as in `ending/happy` or `act-two/rewrite`. A valid name:
//! - is non-empty and at most [`MAX_BRANCH_NAME_LEN`] characters long
//! - has no whitespace, control characters, or any of `~ ^ : ? * [ \`
//! - has no empty part between slashes
//! - has no part that starts or ends with `.` or contains `..`

use crate::error::{HistoryError, HistoryResult};

/// Longest accepted branch name, in characters.
pub const MAX_BRANCH_NAME_LEN: usize = 64;

const FORBIDDEN_CHARS: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];

fn invalid(name: &str, reason: impl Into<String>) -> HistoryError {
    HistoryError::InvalidBranchName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a story branch name.
///
/// # Examples
///
/// ```
/// use plotweave_history::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("ending/happy").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("alternate ending").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> HistoryResult<()> {
    if name.is_empty() {
        return Err(invalid(name, "a branch needs a name"));
    }
    if name.chars().count() > MAX_BRANCH_NAME_LEN {
        return Err(invalid(
            name,
            format!("longer than {MAX_BRANCH_NAME_LEN} characters"),
        ));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(c))
    {
        return Err(invalid(name, format!("{ch:?} is not allowed; use '-' between words")));
    }
    for part in name.split('/') {
        if part.is_empty() {
            return Err(invalid(name, "empty part between slashes"));
        }
        if part.starts_with('.') || part.ends_with('.') || part.contains("..") {
            return Err(invalid(
                name,
                format!("part {part:?} starts or ends with '.' or contains '..'"),
            ));
        }
    }
    Ok(())
}
