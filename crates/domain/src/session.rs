use serde::{Deserialize, Serialize};

use crate::{CreateError, DeleteError, Password, ReadError, Username, ValidationError};

uuid_id!(UserID);

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn sign_up(
        &self,
        email: &str,
        password: &Password,
        username: &Username,
    ) -> Result<User, CreateError>;
    async fn sign_in(&self, email: &str, password: &Password) -> Result<User, ReadError>;
    async fn sign_out(&self) -> Result<(), DeleteError>;
    async fn get_session(&self) -> Result<User, ReadError>;

    fn validate_email(&self, email: &str) -> Result<String, ValidationError> {
        let email = email.trim();
        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.chars().any(char::is_whitespace) =>
            {
                Ok(email.to_string())
            }
            _ => Err(ValidationError::Other("Invalid email address".into())),
        }
    }

    fn validate_password_confirmation(
        &self,
        password: &str,
        confirmation: &str,
    ) -> Result<Password, ValidationError> {
        if password != confirmation {
            return Err(ValidationError::Other("Passwords do not match".into()));
        }
        Password::new(password).map_err(|err| ValidationError::Other(err.into()))
    }
}

#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    async fn sign_up(
        &self,
        email: &str,
        password: &Password,
        username: &Username,
    ) -> Result<User, CreateError>;
    async fn sign_in(&self, email: &str, password: &Password) -> Result<User, ReadError>;
    async fn sign_out(&self) -> Result<(), DeleteError>;
    /// Fails with `StorageError::NoSession` if nobody is signed in.
    async fn read_session(&self) -> Result<User, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserID,
    #[serde(default)]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    struct Validator;

    impl SessionService for Validator {
        async fn sign_up(&self, _: &str, _: &Password, _: &Username) -> Result<User, CreateError> {
            unimplemented!()
        }
        async fn sign_in(&self, _: &str, _: &Password) -> Result<User, ReadError> {
            unimplemented!()
        }
        async fn sign_out(&self) -> Result<(), DeleteError> {
            unimplemented!()
        }
        async fn get_session(&self) -> Result<User, ReadError> {
            unimplemented!()
        }
    }

    #[rstest]
    #[case("alice@example.com", Some("alice@example.com"))]
    #[case("  bob@mail.example.org ", Some("bob@mail.example.org"))]
    #[case("alice", None)]
    #[case("@example.com", None)]
    #[case("alice@example", None)]
    #[case("alice@.com", None)]
    #[case("al ice@example.com", None)]
    fn test_validate_email(#[case] email: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            Validator.validate_email(email).ok().as_deref(),
            expected
        );
    }

    #[rstest]
    #[case("secret", "secret", true)]
    #[case("secret", "Secret", false)]
    #[case("short", "short", false)]
    fn test_validate_password_confirmation(
        #[case] password: &str,
        #[case] confirmation: &str,
        #[case] valid: bool,
    ) {
        assert_eq!(
            Validator
                .validate_password_confirmation(password, confirmation)
                .is_ok(),
            valid
        );
    }
}
