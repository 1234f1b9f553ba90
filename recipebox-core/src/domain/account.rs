//! Account domain model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::password;
use super::result::{Error, Result};

/// A user identity with credentials and privilege flags
///
/// The email is the login identifier. It is stored normalized (see
/// [`Account::normalize_email`]) and is unique across accounts.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Argon2id PHC string; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account, hashing the given password
    ///
    /// The email is normalized; an empty email is rejected.
    pub fn new(email: &str, password: &str) -> Result<Self> {
        let email = Self::normalize_email(email);
        if email.is_empty() {
            return Err(Error::validation("Users must have an email address"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            email,
            name: String::new(),
            password_hash: password::hash_password(password)?,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: Utc::now(),
        })
    }

    /// Normalize an email address
    ///
    /// Surrounding whitespace is stripped and the domain part (after the
    /// last `@`) is lowercased. The local part is left untouched. Input
    /// without an `@` is only trimmed.
    pub fn normalize_email(email: &str) -> String {
        let email = email.trim();
        match email.rsplit_once('@') {
            Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
            None => email.to_string(),
        }
    }

    /// Replace the stored password hash
    pub fn set_password(&mut self, password: &str) -> Result<()> {
        self.password_hash = password::hash_password(password)?;
        Ok(())
    }

    /// Check a plaintext password against the stored hash
    pub fn check_password(&self, password: &str) -> bool {
        password::verify_password(&self.password_hash, password)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain_normalization() {
        assert_eq!(
            Account::normalize_email("test@carousell.COM"),
            "test@carousell.com"
        );
        assert_eq!(Account::normalize_email(" Jane@Example.ORG "), "Jane@example.org");
    }

    #[test]
    fn test_normalize_uses_last_at_sign() {
        assert_eq!(Account::normalize_email("a@b@EXAMPLE.com"), "a@b@example.com");
        assert_eq!(Account::normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_new_account_defaults() {
        let account = Account::new("test@email.com", "1234567").unwrap();
        assert!(account.is_active);
        assert!(!account.is_staff);
        assert!(!account.is_superuser);
        assert!(account.check_password("1234567"));
        assert_eq!(account.to_string(), "test@email.com");
    }

    #[test]
    fn test_empty_email_rejected() {
        assert!(Account::new("", "pw").unwrap_err().is_validation());
        assert!(Account::new("   ", "pw").unwrap_err().is_validation());
    }

    #[test]
    fn test_set_password() {
        let mut account = Account::new("test@email.com", "old").unwrap();
        account.set_password("new").unwrap();
        assert!(account.check_password("new"));
        assert!(!account.check_password("old"));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let account = Account::new("test@email.com", "1234567").unwrap();
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "test@email.com");
    }
}
