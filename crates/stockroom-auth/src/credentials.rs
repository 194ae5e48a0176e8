//! # Login Verification
//!
//! The one place that sees both a plaintext password and a stored digest.
//! Every failure mode — unknown email, password-less (OAuth-only)
//! account, wrong password — collapses into the same
//! [`DomainError::InvalidCredentials`] so a caller cannot probe which
//! emails are registered.

use bson::Document;
use stockroom_core::DomainError;
use stockroom_store::UserRepository;

use crate::password;

/// Verify an email/password pair, returning the sanitized user record on
/// success.
pub async fn login(
    users: &UserRepository,
    email: &str,
    plain_password: &str,
) -> Result<Document, DomainError> {
    let mut user = users
        .find_by_email(email)
        .await?
        .ok_or(DomainError::InvalidCredentials)?;

    let digest = user
        .get_str("password")
        .map_err(|_| DomainError::InvalidCredentials)?
        .to_string();

    if !password::verify(plain_password, &digest) {
        return Err(DomainError::InvalidCredentials);
    }

    user.remove("password");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use std::sync::Arc;
    use stockroom_store::MemoryStore;

    async fn users_with_account() -> UserRepository {
        let users = UserRepository::new(Arc::new(MemoryStore::new()));
        users.ensure_indexes().await.unwrap();
        users
            .create(
                doc! { "name": "John Doe", "email": "John@Example.com" },
                Some(password::hash("password123").unwrap()),
            )
            .await
            .unwrap();
        users
    }

    #[tokio::test]
    async fn test_login_succeeds_with_case_folded_email() {
        let users = users_with_account().await;
        let user = login(&users, "JOHN@example.COM", "password123").await.unwrap();
        assert_eq!(user.get_str("email").unwrap(), "john@example.com");
        assert!(!user.contains_key("password"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let users = users_with_account().await;
        let err = login(&users, "john@example.com", "password124").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid_credentials() {
        let users = users_with_account().await;
        let err = login(&users, "nobody@example.com", "password123").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_password_less_account_cannot_password_login() {
        let users = users_with_account().await;
        users
            .create(doc! { "name": "OAuth Only", "email": "oauth@example.com" }, None)
            .await
            .unwrap();

        let err = login(&users, "oauth@example.com", "anything").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }
}
