use chrono::{DateTime, Utc};

/// Prefix of every session token.
pub const TOKEN_PREFIX: &str = "session-token";

/// A registered account. The username doubles as the user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    pub karma: i64,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            karma: 0,
            created_at: Utc::now(),
        }
    }
}

/// Session tokens are derived from the username; they carry no secret.
pub fn mint_token(username: &str) -> String {
    format!("{TOKEN_PREFIX}-{username}")
}

/// Recovers the username a token was minted for.
pub fn username_from_token(token: &str) -> Option<&str> {
    token
        .strip_prefix(TOKEN_PREFIX)
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|username| !username.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip_keeps_dashes() {
        let token = mint_token("mary-jane");
        assert_eq!(token, "session-token-mary-jane");
        assert_eq!(username_from_token(&token), Some("mary-jane"));
    }

    #[test]
    fn test_rejects_foreign_tokens() {
        assert_eq!(username_from_token("bearer-alice"), None);
        assert_eq!(username_from_token("session-token-"), None);
        assert_eq!(username_from_token("session-tokenalice"), None);
    }
}
