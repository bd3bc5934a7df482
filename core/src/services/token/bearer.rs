//! Bearer header handling

use crate::errors::TokenError;

const BEARER_PREFIX: &str = "Bearer ";

/// Trim whitespace and drop a leading `Bearer ` prefix if present
pub fn normalize_token(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Token carried by an `Authorization` header value
pub fn extract_bearer_token(header: &str) -> Result<&str, TokenError> {
    let token = header
        .trim()
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or_else(|| TokenError::malformed("authorization header is not a bearer credential"))?;

    if token.is_empty() {
        return Err(TokenError::malformed("bearer credential is empty"));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("abc.def.ghi"), "abc.def.ghi");
        assert_eq!(normalize_token("  Bearer abc.def.ghi \n"), "abc.def.ghi");
        assert_eq!(normalize_token("bearer abc"), "bearer abc");
        assert_eq!(normalize_token(""), "");
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(matches!(
            extract_bearer_token("Basic dXNlcjpwYXNz"),
            Err(TokenError::Malformed { .. })
        ));
        assert!(matches!(
            extract_bearer_token("Bearer    "),
            Err(TokenError::Malformed { .. })
        ));
    }
}
