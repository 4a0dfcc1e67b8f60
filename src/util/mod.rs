//! Utility functions for common operations.
//!
//! Shared utilities used across the crate:
//! - Atomic file operations for data safety
//! - Connection-secret redaction for logs and Debug output
//! - Display truncation helpers

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::NamedTempFile;

use crate::error::{Result, TabgazeError};

/// Atomically write content to a file.
///
/// Writes to a temporary file in the same directory, flushes, then renames
/// onto the target path. If any step fails the original file (when present)
/// is left unchanged.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be determined or created
/// - The temporary file cannot be created or written
/// - The atomic rename (persist) operation fails
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = path.parent().ok_or_else(|| TabgazeError::IoError {
        context: format!("Cannot determine parent directory for: {}", path.display()),
        source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
    })?;

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            TabgazeError::io(
                format!("Failed to create directory: {}", parent.display()),
                e,
            )
        })?;
    }

    // Temp file must live in the same directory so the rename stays on one
    // filesystem.
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        TabgazeError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        TabgazeError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        TabgazeError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        TabgazeError::io(format!("Failed to persist file: {}", path.display()), e.error)
    })?;

    Ok(())
}

/// Patterns for secrets that may appear inside a connection string.
static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(AccountKey=)[^;]+").expect("valid regex"),
        Regex::new(r"(?i)(SharedAccessSignature=)[^;]+").expect("valid regex"),
        Regex::new(r"(?i)(sig=)[^&;]+").expect("valid regex"),
        Regex::new(r"(?i)(password=)[^;]+").expect("valid regex"),
    ]
});

/// Redact secret components of a connection string.
///
/// Account keys, SAS tokens, and passwords are replaced with `***` so the
/// string is safe to log or display. Input without secrets is returned
/// unchanged (borrowed).
#[must_use]
pub fn redact_secrets(input: &str) -> Cow<'_, str> {
    let mut result = Cow::Borrowed(input);
    for pattern in SECRET_PATTERNS.iter() {
        if pattern.is_match(&result) {
            result = Cow::Owned(pattern.replace_all(&result, "${1}***").into_owned());
        }
    }
    result
}

/// Truncate a string to `max` characters, appending an ellipsis marker.
///
/// Counts characters, not bytes, so multi-byte content never splits a
/// codepoint.
#[must_use]
pub fn truncate_display(input: &str, max: usize) -> Cow<'_, str> {
    if input.chars().count() <= max {
        return Cow::Borrowed(input);
    }
    let truncated: String = input.chars().take(max.saturating_sub(1)).collect();
    Cow::Owned(format!("{truncated}…"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        atomic_write(&path, b"{\"a\":1}").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_redact_account_key() {
        let conn = "DefaultEndpointsProtocol=https;AccountName=demo;AccountKey=abc123==;TableEndpoint=https://demo";
        let redacted = redact_secrets(conn);
        assert!(redacted.contains("AccountKey=***"));
        assert!(redacted.contains("AccountName=demo"));
        assert!(!redacted.contains("abc123"));
    }

    #[test]
    fn test_redact_no_secrets_borrows() {
        let conn = "TableEndpoint=https://demo";
        assert!(matches!(redact_secrets(conn), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_display() {
        assert_eq!(truncate_display("short", 10), "short");
        assert_eq!(truncate_display("abcdefghij", 5), "abcd…");
    }
}
