use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Back off to a char boundary: slicing at a fixed byte offset
        // panics inside a multibyte character, and error bodies (proxy
        // pages and the like) are not guaranteed to be ASCII.
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    /// Whether this failure can leave the caller's state untouched and
    /// be retried later (network/parse trouble), as opposed to a setup
    /// problem that retrying cannot fix.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ApiError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short_passthrough() {
        assert_eq!(ApiError::truncate_body("{}"), "{}");
    }

    #[test]
    fn test_truncate_body_long() {
        let body = "x".repeat(600);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.contains("600 total bytes"));
    }

    #[test]
    fn test_truncate_body_multibyte_boundary() {
        // 200 euro signs = 600 bytes, with byte 500 falling inside a
        // character; must truncate on a boundary instead of panicking.
        let body = "\u{20ac}".repeat(200);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("600 total bytes"));
        assert!(truncated.starts_with('\u{20ac}'));
        assert!(!truncated.contains('\u{fffd}'));
    }

    #[test]
    fn test_configuration_is_not_transient() {
        assert!(!ApiError::Configuration("BACKEND_URL is not set".into()).is_transient());
        assert!(ApiError::InvalidResponse("<html>".into()).is_transient());
    }
}
