//! Repository port - database abstraction

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Account, Ingredient, Recipe, Tag};

/// Database repository abstraction
///
/// This trait defines all persistence operations the services rely on.
/// Implementations (adapters) provide the actual database access logic.
/// Ownership checks live in the services; the repository only stores.
pub trait Repository: Send + Sync {
    // === Schema ===

    /// Run any pending migrations
    fn ensure_schema(&self) -> Result<()>;

    // === Accounts ===

    /// Insert a new account. Fails with `Error::Conflict` on a duplicate email.
    fn insert_account(&self, account: &Account) -> Result<()>;

    /// Get account by ID
    fn get_account_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Get account by (already normalized) email
    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Update name, password hash and flags of an existing account
    fn update_account(&self, account: &Account) -> Result<()>;

    // === Tags ===

    fn insert_tag(&self, tag: &Tag) -> Result<()>;

    /// Tags owned by a user, ordered by name descending.
    /// With `assigned_only`, only tags attached to at least one recipe.
    fn get_tags_for_user(&self, user_id: Uuid, assigned_only: bool) -> Result<Vec<Tag>>;

    fn get_tags_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>>;

    // === Ingredients ===

    fn insert_ingredient(&self, ingredient: &Ingredient) -> Result<()>;

    /// Ingredients owned by a user, ordered by name descending.
    /// With `assigned_only`, only ingredients attached to at least one recipe.
    fn get_ingredients_for_user(
        &self,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>>;

    fn get_ingredients_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Ingredient>>;

    // === Recipes ===

    /// Insert a recipe together with its tag and ingredient links
    fn insert_recipe(&self, recipe: &Recipe) -> Result<()>;

    fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>>;

    /// Recipes owned by a user, newest first, narrowed by the filter
    fn get_recipes_for_user(&self, user_id: Uuid, filter: &RecipeFilter) -> Result<Vec<Recipe>>;

    /// Update scalar fields and replace the tag and ingredient links
    fn update_recipe(&self, recipe: &Recipe) -> Result<()>;

    /// Delete a recipe and its links. Returns false if it did not exist.
    fn delete_recipe(&self, id: Uuid) -> Result<bool>;
}

/// Recipe list filter
///
/// A non-empty `tags` list keeps recipes carrying any of those tags; the
/// same for `ingredients`. Both lists combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<Uuid>,
}

impl RecipeFilter {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.ingredients.is_empty()
    }
}
