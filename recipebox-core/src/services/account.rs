//! Account service - user creation and profile management

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::ports::Repository;

/// Recognized options when creating an account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountOptions {
    pub is_staff: bool,
    pub is_superuser: bool,
    /// Display name, empty when not given
    pub name: String,
}

impl AccountOptions {
    /// Options for an elevated account
    pub fn superuser() -> Self {
        Self {
            is_staff: true,
            is_superuser: true,
            name: String::new(),
        }
    }
}

/// Changes applied by [`AccountService::update_profile`]
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Creates and manages user accounts
pub struct AccountService {
    repository: Arc<dyn Repository>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Create and persist a new account
    ///
    /// The email is required and stored normalized; the password is stored
    /// hashed. Fails with `Error::Validation` when the email is missing or
    /// blank, and `Error::Conflict` when it is already taken.
    pub fn create_user(
        &self,
        email: Option<&str>,
        password: &str,
        options: AccountOptions,
    ) -> Result<Account> {
        let email = match email {
            Some(e) if !e.trim().is_empty() => e,
            _ => return Err(Error::validation("Users must have an email address")),
        };

        let mut account = Account::new(email, password)?;
        account.is_staff = options.is_staff;
        account.is_superuser = options.is_superuser;
        account.name = options.name.trim().to_string();

        if self.repository.get_account_by_email(&account.email)?.is_some() {
            return Err(Error::conflict(format!(
                "An account with email {} already exists",
                account.email
            )));
        }

        self.repository.insert_account(&account)?;
        Ok(account)
    }

    /// Create and persist an account with staff and superuser flags set
    pub fn create_superuser(&self, email: Option<&str>, password: &str) -> Result<Account> {
        self.create_user(email, password, AccountOptions::superuser())
    }

    /// Look up an account by id
    pub fn get(&self, id: Uuid) -> Result<Account> {
        self.repository
            .get_account_by_id(id)?
            .ok_or_else(|| Error::not_found(format!("Account {}", id)))
    }

    /// Look up an account by email (normalized before the lookup)
    pub fn get_by_email(&self, email: &str) -> Result<Account> {
        let normalized = Account::normalize_email(email);
        self.repository
            .get_account_by_email(&normalized)?
            .ok_or_else(|| Error::not_found(format!("No account with email {}", normalized)))
    }

    /// Change the name and/or password of an account
    pub fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Account> {
        let mut account = self.get(id)?;

        if let Some(name) = update.name {
            account.name = name.trim().to_string();
        }
        if let Some(password) = update.password {
            if password.is_empty() {
                return Err(Error::validation("Password cannot be empty"));
            }
            account.set_password(&password)?;
        }

        self.repository.update_account(&account)?;
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;

    fn service() -> AccountService {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.ensure_schema().unwrap();
        AccountService::new(Arc::new(repo))
    }

    #[test]
    fn test_create_user_with_email_successful() {
        let service = service();
        let email = "test@carousell.com";
        let password = "1234567";

        let user = service
            .create_user(Some(email), password, AccountOptions::default())
            .unwrap();

        assert_eq!(user.email, email);
        assert!(user.check_password(password));
        assert!(!user.is_staff);
        assert!(!user.is_superuser);
    }

    #[test]
    fn test_new_user_email_normalized() {
        let service = service();
        let email = "test@carousell.COM";

        let user = service
            .create_user(Some(email), "1234567", AccountOptions::default())
            .unwrap();

        assert_eq!(user.email, email.to_lowercase());
    }

    #[test]
    fn test_new_user_invalid_email() {
        let service = service();
        let err = service
            .create_user(None, "test123", AccountOptions::default())
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create_user(Some(""), "test123", AccountOptions::default())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_create_new_superuser() {
        let service = service();
        let user = service
            .create_superuser(Some("test@carousell.com"), "1234567")
            .unwrap();

        assert!(user.is_superuser);
        assert!(user.is_staff);
    }

    #[test]
    fn test_duplicate_email_after_normalization() {
        let service = service();
        service
            .create_user(Some("dup@example.com"), "pw", AccountOptions::default())
            .unwrap();

        let err = service
            .create_user(Some("dup@EXAMPLE.com"), "pw", AccountOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_get_by_email_normalizes() {
        let service = service();
        let created = service
            .create_user(Some("find@example.com"), "pw", AccountOptions::default())
            .unwrap();

        let found = service.get_by_email("find@Example.COM").unwrap();
        assert_eq!(found.id, created.id);
        assert!(service.get_by_email("nobody@example.com").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_profile() {
        let service = service();
        let user = service
            .create_user(Some("me@example.com"), "oldpass", AccountOptions::default())
            .unwrap();

        let updated = service
            .update_profile(
                user.id,
                ProfileUpdate {
                    name: Some("  New Name ".to_string()),
                    password: Some("newpass".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "New Name");

        let stored = service.get(user.id).unwrap();
        assert!(stored.check_password("newpass"));
        assert!(!stored.check_password("oldpass"));
    }

    #[test]
    fn test_update_profile_rejects_empty_password() {
        let service = service();
        let user = service
            .create_user(Some("me@example.com"), "pw", AccountOptions::default())
            .unwrap();

        let err = service
            .update_profile(
                user.id,
                ProfileUpdate {
                    name: None,
                    password: Some(String::new()),
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
    }
}
