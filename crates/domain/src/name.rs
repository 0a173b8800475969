use derive_more::{AsRef, Display};
use serde::{Deserialize, Serialize};

#[derive(
    AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(username: &str) -> Result<Self, UsernameError> {
        let trimmed = username.trim();

        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }

        let len = trimmed.chars().count();

        if len > 32 {
            return Err(UsernameError::TooLong(len));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(UsernameError::Whitespace);
        }

        Ok(Username(trimmed.to_string()))
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::new(&value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
    #[error("Username must be 32 characters or fewer ({0} > 32)")]
    TooLong(usize),
    #[error("Username must not contain whitespace")]
    Whitespace,
}

/// Never displayed or logged, only handed to the authentication backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: &str) -> Result<Self, PasswordError> {
        let len = password.chars().count();

        if len < 6 {
            return Err(PasswordError::TooShort(len));
        }

        Ok(Password(password.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PasswordError {
    #[error("Password must be at least 6 characters long ({0} < 6)")]
    TooShort(usize),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("alice", Ok(Username("alice".to_string())))]
    #[case("  bob_42  ", Ok(Username("bob_42".to_string())))]
    #[case("", Err(UsernameError::Empty))]
    #[case("   ", Err(UsernameError::Empty))]
    #[case("gym rat", Err(UsernameError::Whitespace))]
    #[case(
        "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        Err(UsernameError::TooLong(33))
    )]
    fn test_username_new(#[case] name: &str, #[case] expected: Result<Username, UsernameError>) {
        assert_eq!(Username::new(name), expected);
    }

    #[test]
    fn test_username_deserialize_validates() {
        assert_eq!(
            serde_json::from_str::<Username>("\"carol\"").unwrap(),
            Username("carol".to_string())
        );
        assert!(serde_json::from_str::<Username>("\"\"").is_err());
    }

    #[rstest]
    #[case("secret", Ok(()))]
    #[case("12345", Err(PasswordError::TooShort(5)))]
    #[case("", Err(PasswordError::TooShort(0)))]
    fn test_password_new(#[case] password: &str, #[case] expected: Result<(), PasswordError>) {
        assert_eq!(Password::new(password).map(|_| ()), expected);
    }

    #[test]
    fn test_password_debug_is_redacted() {
        assert_eq!(
            format!("{:?}", Password::new("hunter22").unwrap()),
            "Password(***)"
        );
    }
}
