//! Ingredient service

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, Ingredient};
use crate::ports::Repository;

/// Ingredient service
pub struct IngredientService {
    repository: Arc<dyn Repository>,
}

impl IngredientService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Create an ingredient owned by `owner`
    pub fn create(&self, owner: &Account, name: &str) -> Result<Ingredient> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Ingredient name cannot be empty"));
        }
        if self.repository.get_account_by_id(owner.id)?.is_none() {
            return Err(Error::not_found(format!("Account {}", owner.id)));
        }

        let ingredient = Ingredient::new(owner.id, name);
        self.repository.insert_ingredient(&ingredient)?;
        Ok(ingredient)
    }

    /// List the owner's ingredients, ordered by name descending
    pub fn list(&self, owner: &Account, assigned_only: bool) -> Result<Vec<Ingredient>> {
        self.repository.get_ingredients_for_user(owner.id, assigned_only)
    }
}
