use crate::errors::{BiolinkError, Result};
use crate::storage::normalize_handle;

pub const HANDLE_MIN_LEN: usize = 3;
pub const HANDLE_MAX_LEN: usize = 20;

/// 校验 handle 并返回其小写形式
///
/// 3–20 个字符，只允许字母、数字、`_` 和 `-`。
pub fn validate_handle(raw: &str) -> Result<String> {
    let handle = normalize_handle(raw);
    let len = handle.chars().count();

    if !(HANDLE_MIN_LEN..=HANDLE_MAX_LEN).contains(&len) {
        return Err(BiolinkError::validation(format!(
            "Handle must be {}-{} characters long",
            HANDLE_MIN_LEN, HANDLE_MAX_LEN
        )));
    }

    if let Some(bad) = handle
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(BiolinkError::validation(format!(
            "Handle contains invalid character '{}'",
            bad
        )));
    }

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_handles_are_lowercased() {
        assert_eq!(validate_handle("Alice").unwrap(), "alice");
        assert_eq!(validate_handle(" dev_ops-1 ").unwrap(), "dev_ops-1");
    }

    #[test]
    fn test_length_bounds() {
        assert!(validate_handle("ab").is_err());
        assert!(validate_handle("abc").is_ok());
        assert!(validate_handle(&"a".repeat(20)).is_ok());
        assert!(validate_handle(&"a".repeat(21)).is_err());
    }

    #[test]
    fn test_rejects_other_characters() {
        for bad in ["with space", "dot.name", "émile", "a/b/c"] {
            let err = validate_handle(bad).unwrap_err();
            assert!(matches!(err, BiolinkError::Validation(_)), "{}", bad);
        }
    }
}
