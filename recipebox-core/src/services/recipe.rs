//! Recipe service - recipe CRUD, filtering and image uploads

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, Ingredient, Recipe, Tag};
use crate::ports::{MediaStorage, RecipeFilter, Repository};
use crate::services::UploadPathGenerator;

/// Input for creating a recipe
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: u32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<Uuid>,
}

impl NewRecipe {
    pub fn new(title: impl Into<String>, time_minutes: u32, price: Decimal) -> Self {
        Self {
            title: title.into(),
            time_minutes,
            price,
            link: String::new(),
            tags: Vec::new(),
            ingredients: Vec::new(),
        }
    }
}

/// Partial update; `None` fields are left unchanged
///
/// `tags` and `ingredients` replace the whole set when given.
#[derive(Debug, Clone, Default)]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub time_minutes: Option<u32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<Uuid>>,
    pub ingredients: Option<Vec<Uuid>>,
}

/// A recipe with its tags and ingredients resolved
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

/// Recipe service
pub struct RecipeService {
    repository: Arc<dyn Repository>,
    media: Arc<dyn MediaStorage>,
    upload_paths: UploadPathGenerator,
}

impl RecipeService {
    pub fn new(
        repository: Arc<dyn Repository>,
        media: Arc<dyn MediaStorage>,
        upload_paths: UploadPathGenerator,
    ) -> Self {
        Self {
            repository,
            media,
            upload_paths,
        }
    }

    /// Create a recipe owned by `owner`
    ///
    /// Every referenced tag and ingredient must belong to the owner.
    pub fn create(&self, owner: &Account, input: NewRecipe) -> Result<Recipe> {
        if self.repository.get_account_by_id(owner.id)?.is_none() {
            return Err(Error::not_found(format!("Account {}", owner.id)));
        }

        let mut recipe = Recipe::new(owner.id, input.title, input.time_minutes, input.price);
        recipe.link = input.link;
        recipe.tags = self.owned_tags(owner, input.tags)?;
        recipe.ingredients = self.owned_ingredients(owner, input.ingredients)?;

        self.repository.insert_recipe(&recipe)?;
        Ok(recipe)
    }

    /// Fetch one of the owner's recipes with tags and ingredients resolved
    pub fn get(&self, owner: &Account, id: Uuid) -> Result<RecipeDetail> {
        let recipe = self.owned_recipe(owner, id)?;
        let tags = self.repository.get_tags_by_ids(&recipe.tags)?;
        let ingredients = self.repository.get_ingredients_by_ids(&recipe.ingredients)?;
        Ok(RecipeDetail {
            recipe,
            tags,
            ingredients,
        })
    }

    /// List the owner's recipes, newest first
    pub fn list(&self, owner: &Account, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        self.repository.get_recipes_for_user(owner.id, filter)
    }

    /// Apply a partial update to one of the owner's recipes
    pub fn update(&self, owner: &Account, id: Uuid, update: RecipeUpdate) -> Result<Recipe> {
        let mut recipe = self.owned_recipe(owner, id)?;

        if let Some(title) = update.title {
            recipe.title = title;
        }
        if let Some(time_minutes) = update.time_minutes {
            recipe.time_minutes = time_minutes;
        }
        if let Some(price) = update.price {
            recipe.price = price;
        }
        if let Some(link) = update.link {
            recipe.link = link;
        }
        if let Some(tags) = update.tags {
            recipe.tags = self.owned_tags(owner, tags)?;
        }
        if let Some(ingredients) = update.ingredients {
            recipe.ingredients = self.owned_ingredients(owner, ingredients)?;
        }
        recipe.updated_at = Utc::now();

        self.repository.update_recipe(&recipe)?;
        Ok(recipe)
    }

    /// Delete one of the owner's recipes
    pub fn delete(&self, owner: &Account, id: Uuid) -> Result<()> {
        self.owned_recipe(owner, id)?;
        if !self.repository.delete_recipe(id)? {
            return Err(Error::not_found(format!("Recipe {}", id)));
        }
        Ok(())
    }

    /// Store an uploaded image for one of the owner's recipes
    ///
    /// The file is written under a freshly generated upload path and the
    /// recipe's `image` is pointed at it.
    pub fn upload_image(
        &self,
        owner: &Account,
        id: Uuid,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<Recipe> {
        if bytes.is_empty() {
            return Err(Error::validation("Uploaded image is empty"));
        }
        let mut recipe = self.owned_recipe(owner, id)?;

        let path = self
            .upload_paths
            .recipe_image_file_path(Some(&recipe), original_filename);
        self.media.save(&path, bytes)?;

        recipe.image = Some(path);
        recipe.updated_at = Utc::now();
        self.repository.update_recipe(&recipe)?;
        Ok(recipe)
    }

    /// Load a recipe, hiding recipes of other owners
    fn owned_recipe(&self, owner: &Account, id: Uuid) -> Result<Recipe> {
        match self.repository.get_recipe(id)? {
            Some(recipe) if recipe.user_id == owner.id => Ok(recipe),
            _ => Err(Error::not_found(format!("Recipe {}", id))),
        }
    }

    fn owned_tags(&self, owner: &Account, ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
        let ids = sorted_unique(ids);
        let found = self.repository.get_tags_by_ids(&ids)?;
        check_owned(
            "tag",
            &ids,
            found.iter().filter(|t| t.user_id == owner.id).map(|t| t.id),
        )?;
        Ok(ids)
    }

    fn owned_ingredients(&self, owner: &Account, ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
        let ids = sorted_unique(ids);
        let found = self.repository.get_ingredients_by_ids(&ids)?;
        check_owned(
            "ingredient",
            &ids,
            found.iter().filter(|i| i.user_id == owner.id).map(|i| i.id),
        )?;
        Ok(ids)
    }
}

/// Sorted, duplicate-free ids; the same order the repository loads links in
fn sorted_unique(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn check_owned(kind: &str, requested: &[Uuid], owned: impl Iterator<Item = Uuid>) -> Result<()> {
    let owned: HashSet<Uuid> = owned.collect();
    match requested.iter().find(|id| !owned.contains(*id)) {
        Some(missing) => Err(Error::validation(format!("Unknown {}: {}", kind, missing))),
        None => Ok(()),
    }
}
