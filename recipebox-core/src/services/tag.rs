//! Tag service - user-owned recipe labels

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, Tag};
use crate::ports::Repository;

/// Tag service
pub struct TagService {
    repository: Arc<dyn Repository>,
}

impl TagService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Create a tag owned by `owner`
    pub fn create(&self, owner: &Account, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Tag name cannot be empty"));
        }
        if self.repository.get_account_by_id(owner.id)?.is_none() {
            return Err(Error::not_found(format!("Account {}", owner.id)));
        }

        let tag = Tag::new(owner.id, name);
        self.repository.insert_tag(&tag)?;
        Ok(tag)
    }

    /// List the owner's tags, ordered by name descending
    ///
    /// With `assigned_only`, only tags used by at least one recipe.
    pub fn list(&self, owner: &Account, assigned_only: bool) -> Result<Vec<Tag>> {
        self.repository.get_tags_for_user(owner.id, assigned_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;

    fn setup() -> (Arc<DuckDbRepository>, Account) {
        let repo = Arc::new(DuckDbRepository::in_memory().unwrap());
        repo.ensure_schema().unwrap();
        let owner = Account::new("test@email.com", "1234567").unwrap();
        repo.insert_account(&owner).unwrap();
        (repo, owner)
    }

    #[test]
    fn test_tag_str() {
        let (repo, owner) = setup();
        let service = TagService::new(repo);

        let tag = service.create(&owner, "Tester1").unwrap();

        assert_eq!(tag.to_string(), tag.name);
        assert_eq!(tag.to_string(), "Tester1");
        assert_eq!(tag.user_id, owner.id);
    }

    #[test]
    fn test_list_ordered_by_name_desc() {
        let (repo, owner) = setup();
        let service = TagService::new(repo);
        service.create(&owner, "Breakfast").unwrap();
        service.create(&owner, "Vegan").unwrap();
        service.create(&owner, "Dessert").unwrap();

        let names: Vec<String> = service
            .list(&owner, false)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Vegan", "Dessert", "Breakfast"]);
    }

    #[test]
    fn test_list_limited_to_owner() {
        let (repo, owner) = setup();
        let other = Account::new("other@email.com", "pw").unwrap();
        repo.insert_account(&other).unwrap();
        let service = TagService::new(repo);

        service.create(&owner, "Mine").unwrap();
        service.create(&other, "Theirs").unwrap();

        let tags = service.list(&owner, false).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Mine");
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let (repo, owner) = setup();
        let service = TagService::new(repo);
        assert!(service.create(&owner, "  ").unwrap_err().is_validation());
    }

    #[test]
    fn test_create_requires_existing_owner() {
        let (repo, _) = setup();
        let service = TagService::new(repo);
        let stranger = Account::new("ghost@email.com", "pw").unwrap();
        assert!(service.create(&stranger, "Lost").unwrap_err().is_not_found());
    }
}
