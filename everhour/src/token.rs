use std::fmt;

use thiserror::Error;

/// Header carrying the token on every authenticated request.
pub const API_KEY_HEADER: &str = "X-Api-Key";

const MIN_TOKEN_LEN: usize = 10;

/// Opaque Everhour API token. The value never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidTokenError {
    #[error("Token is empty")]
    Empty,
    #[error("Token looks invalid (expected at least 10 characters)")]
    TooShort,
}

impl ApiToken {
    /// Wrap a token read from storage without validating its shape.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Validate user input the way the token prompt does.
    pub fn parse(input: &str) -> Result<Self, InvalidTokenError> {
        let value = input.trim();
        if value.is_empty() {
            return Err(InvalidTokenError::Empty);
        }
        if value.len() < MIN_TOKEN_LEN {
            return Err(InvalidTokenError::TooShort);
        }
        Ok(Self(value.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_validates_length() {
        assert_eq!(ApiToken::parse("   "), Err(InvalidTokenError::Empty));
        assert_eq!(ApiToken::parse("short"), Err(InvalidTokenError::TooShort));
        let token = ApiToken::parse("  0123456789abcdef \n").unwrap();
        assert_eq!(token.expose(), "0123456789abcdef");
    }

    #[test]
    fn debug_does_not_leak_value() {
        let token = ApiToken::new("super-secret-token");
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
