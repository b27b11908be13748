//! Command handlers grouped by the page they stand in for.

pub(crate) mod applications;
pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod groups;
pub(crate) mod interests;
pub(crate) mod me;

use crate::client::{CliError, CliResult};

pub(crate) fn require_non_empty(value: &str, field: &str) -> CliResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
