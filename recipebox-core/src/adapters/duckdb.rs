//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::types::Type;
use duckdb::{params, params_from_iter, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, Ingredient, Recipe, Tag};
use crate::ports::{RecipeFilter, Repository};
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const ACCOUNT_COLUMNS: &str =
    "user_id, email, name, password_hash, is_active, is_staff, is_superuser, created_at";

const RECIPE_COLUMNS: &str =
    "recipe_id, user_id, title, time_minutes, price, link, image, created_at, updated_at";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

fn is_constraint_violation(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("duplicate key") || lower.contains("violates unique constraint")
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        let msg = err.to_string();
        if is_constraint_violation(&msg) {
            Error::Conflict(msg)
        } else {
            Error::Database(msg)
        }
    }
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open (or create) a file-backed repository
    ///
    /// Retries with exponential backoff on file locking errors, which occur
    /// when another process holds the database open.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Connection::open(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[recipebox] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.map(Error::from).unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Open a private in-memory repository (used by tests and dry runs)
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: None,
        })
    }

    /// Path of the database file, `None` for in-memory repositories
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    fn row_to_account(row: &duckdb::Row) -> duckdb::Result<Account> {
        Ok(Account {
            id: uuid_at(row, 0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            password_hash: row.get(3)?,
            is_active: row.get(4)?,
            is_staff: row.get(5)?,
            is_superuser: row.get(6)?,
            created_at: timestamp_at(row, 7)?,
        })
    }

    fn row_to_tag(row: &duckdb::Row) -> duckdb::Result<Tag> {
        Ok(Tag {
            id: uuid_at(row, 0)?,
            user_id: uuid_at(row, 1)?,
            name: row.get(2)?,
            created_at: timestamp_at(row, 3)?,
        })
    }

    fn row_to_ingredient(row: &duckdb::Row) -> duckdb::Result<Ingredient> {
        Ok(Ingredient {
            id: uuid_at(row, 0)?,
            user_id: uuid_at(row, 1)?,
            name: row.get(2)?,
            created_at: timestamp_at(row, 3)?,
        })
    }

    /// Map a recipe row; links are loaded separately by `load_links`
    fn row_to_recipe(row: &duckdb::Row) -> duckdb::Result<Recipe> {
        // Column indices follow RECIPE_COLUMNS
        let time_minutes: i64 = row.get(3)?;
        Ok(Recipe {
            id: uuid_at(row, 0)?,
            user_id: uuid_at(row, 1)?,
            title: row.get(2)?,
            time_minutes: u32::try_from(time_minutes).map_err(|e| {
                duckdb::Error::FromSqlConversionFailure(3, Type::BigInt, Box::new(e))
            })?,
            price: decimal_at(row, 4)?,
            link: row.get(5)?,
            image: row.get(6)?,
            tags: Vec::new(),
            ingredients: Vec::new(),
            created_at: timestamp_at(row, 7)?,
            updated_at: timestamp_at(row, 8)?,
        })
    }

    fn load_links(conn: &Connection, recipe: &mut Recipe) -> Result<()> {
        let recipe_id = recipe.id.to_string();
        recipe.tags = query_ids(
            conn,
            "SELECT tag_id FROM sys_recipe_tags WHERE recipe_id = ? ORDER BY tag_id",
            &recipe_id,
        )?;
        recipe.ingredients = query_ids(
            conn,
            "SELECT ingredient_id FROM sys_recipe_ingredients WHERE recipe_id = ? ORDER BY ingredient_id",
            &recipe_id,
        )?;
        Ok(())
    }

    fn insert_links(conn: &Connection, recipe: &Recipe) -> Result<()> {
        let recipe_id = recipe.id.to_string();
        for tag_id in &recipe.tags {
            conn.execute(
                "INSERT INTO sys_recipe_tags (recipe_id, tag_id) VALUES (?, ?)",
                params![recipe_id, tag_id.to_string()],
            )?;
        }
        for ingredient_id in &recipe.ingredients {
            conn.execute(
                "INSERT INTO sys_recipe_ingredients (recipe_id, ingredient_id) VALUES (?, ?)",
                params![recipe_id, ingredient_id.to_string()],
            )?;
        }
        Ok(())
    }

    fn delete_links(conn: &Connection, recipe_id: &str) -> Result<()> {
        conn.execute(
            "DELETE FROM sys_recipe_tags WHERE recipe_id = ?",
            params![recipe_id],
        )?;
        conn.execute(
            "DELETE FROM sys_recipe_ingredients WHERE recipe_id = ?",
            params![recipe_id],
        )?;
        Ok(())
    }
}

impl Repository for DuckDbRepository {
    // === Schema ===

    fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        MigrationService::new(&conn).run_pending()?;
        Ok(())
    }

    // === Accounts ===

    fn insert_account(&self, account: &Account) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO sys_users ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                ACCOUNT_COLUMNS
            ),
            params![
                account.id.to_string(),
                account.email,
                account.name,
                account.password_hash,
                account.is_active,
                account.is_staff,
                account.is_superuser,
                format_timestamp(&account.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_account_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_users WHERE user_id = ?",
            ACCOUNT_COLUMNS
        ))?;
        let mut rows = stmt.query_map([id.to_string()], Self::row_to_account)?;
        Ok(rows.next().transpose()?)
    }

    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_users WHERE email = ?",
            ACCOUNT_COLUMNS
        ))?;
        let mut rows = stmt.query_map([email], Self::row_to_account)?;
        Ok(rows.next().transpose()?)
    }

    fn update_account(&self, account: &Account) -> Result<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE sys_users
             SET name = ?, password_hash = ?, is_active = ?, is_staff = ?, is_superuser = ?
             WHERE user_id = ?",
            params![
                account.name,
                account.password_hash,
                account.is_active,
                account.is_staff,
                account.is_superuser,
                account.id.to_string(),
            ],
        )?;
        if updated == 0 {
            return Err(Error::not_found(format!("Account {}", account.id)));
        }
        Ok(())
    }

    // === Tags ===

    fn insert_tag(&self, tag: &Tag) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_tags (tag_id, user_id, name, created_at) VALUES (?, ?, ?, ?)",
            params![
                tag.id.to_string(),
                tag.user_id.to_string(),
                tag.name,
                format_timestamp(&tag.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_tags_for_user(&self, user_id: Uuid, assigned_only: bool) -> Result<Vec<Tag>> {
        let conn = self.lock()?;
        let assigned = if assigned_only {
            " AND tag_id IN (SELECT tag_id FROM sys_recipe_tags)"
        } else {
            ""
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT tag_id, user_id, name, created_at FROM sys_tags
             WHERE user_id = ?{}
             ORDER BY name DESC, tag_id",
            assigned
        ))?;
        let tags = stmt
            .query_map([user_id.to_string()], Self::row_to_tag)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(tags)
    }

    fn get_tags_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT tag_id, user_id, name, created_at FROM sys_tags
             WHERE tag_id IN ({})
             ORDER BY name DESC, tag_id",
            placeholders(ids.len())
        ))?;
        let tags = stmt
            .query_map(params_from_iter(ids.iter().map(Uuid::to_string)), Self::row_to_tag)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(tags)
    }

    // === Ingredients ===

    fn insert_ingredient(&self, ingredient: &Ingredient) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_ingredients (ingredient_id, user_id, name, created_at) VALUES (?, ?, ?, ?)",
            params![
                ingredient.id.to_string(),
                ingredient.user_id.to_string(),
                ingredient.name,
                format_timestamp(&ingredient.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_ingredients_for_user(
        &self,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>> {
        let conn = self.lock()?;
        let assigned = if assigned_only {
            " AND ingredient_id IN (SELECT ingredient_id FROM sys_recipe_ingredients)"
        } else {
            ""
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT ingredient_id, user_id, name, created_at FROM sys_ingredients
             WHERE user_id = ?{}
             ORDER BY name DESC, ingredient_id",
            assigned
        ))?;
        let ingredients = stmt
            .query_map([user_id.to_string()], Self::row_to_ingredient)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(ingredients)
    }

    fn get_ingredients_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Ingredient>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT ingredient_id, user_id, name, created_at FROM sys_ingredients
             WHERE ingredient_id IN ({})
             ORDER BY name DESC, ingredient_id",
            placeholders(ids.len())
        ))?;
        let ingredients = stmt
            .query_map(
                params_from_iter(ids.iter().map(Uuid::to_string)),
                Self::row_to_ingredient,
            )?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(ingredients)
    }

    // === Recipes ===

    fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO sys_recipes ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                RECIPE_COLUMNS
            ),
            params![
                recipe.id.to_string(),
                recipe.user_id.to_string(),
                recipe.title,
                i64::from(recipe.time_minutes),
                recipe.price.to_string(),
                recipe.link,
                recipe.image,
                format_timestamp(&recipe.created_at),
                format_timestamp(&recipe.updated_at),
            ],
        )?;
        Self::insert_links(&tx, recipe)?;
        tx.commit()?;
        Ok(())
    }

    fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_recipes WHERE recipe_id = ?",
            RECIPE_COLUMNS
        ))?;
        let mut rows = stmt.query_map([id.to_string()], Self::row_to_recipe)?;
        match rows.next().transpose()? {
            Some(mut recipe) => {
                Self::load_links(&conn, &mut recipe)?;
                Ok(Some(recipe))
            }
            None => Ok(None),
        }
    }

    fn get_recipes_for_user(&self, user_id: Uuid, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let conn = self.lock()?;

        let mut sql = format!("SELECT {} FROM sys_recipes WHERE user_id = ?", RECIPE_COLUMNS);
        let mut args = vec![user_id.to_string()];

        if !filter.tags.is_empty() {
            sql.push_str(&format!(
                " AND recipe_id IN (SELECT recipe_id FROM sys_recipe_tags WHERE tag_id IN ({}))",
                placeholders(filter.tags.len())
            ));
            args.extend(filter.tags.iter().map(Uuid::to_string));
        }
        if !filter.ingredients.is_empty() {
            sql.push_str(&format!(
                " AND recipe_id IN (SELECT recipe_id FROM sys_recipe_ingredients WHERE ingredient_id IN ({}))",
                placeholders(filter.ingredients.len())
            ));
            args.extend(filter.ingredients.iter().map(Uuid::to_string));
        }
        sql.push_str(" ORDER BY seq DESC");

        let mut stmt = conn.prepare(&sql)?;
        let mut recipes = stmt
            .query_map(params_from_iter(args.iter()), Self::row_to_recipe)?
            .collect::<duckdb::Result<Vec<_>>>()?;

        for recipe in &mut recipes {
            Self::load_links(&conn, recipe)?;
        }
        Ok(recipes)
    }

    fn update_recipe(&self, recipe: &Recipe) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let recipe_id = recipe.id.to_string();

        let updated = tx.execute(
            "UPDATE sys_recipes
             SET title = ?, time_minutes = ?, price = ?, link = ?, image = ?, updated_at = ?
             WHERE recipe_id = ?",
            params![
                recipe.title,
                i64::from(recipe.time_minutes),
                recipe.price.to_string(),
                recipe.link,
                recipe.image,
                format_timestamp(&recipe.updated_at),
                recipe_id,
            ],
        )?;
        if updated == 0 {
            return Err(Error::not_found(format!("Recipe {}", recipe.id)));
        }

        Self::delete_links(&tx, &recipe_id)?;
        Self::insert_links(&tx, recipe)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_recipe(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let recipe_id = id.to_string();

        Self::delete_links(&tx, &recipe_id)?;
        let deleted = tx.execute(
            "DELETE FROM sys_recipes WHERE recipe_id = ?",
            params![recipe_id],
        )?;
        tx.commit()?;
        Ok(deleted > 0)
    }
}

// Helper functions

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn uuid_at(row: &duckdb::Row, idx: usize) -> duckdb::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn decimal_at(row: &duckdb::Row, idx: usize) -> duckdb::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str_exact(&raw)
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn timestamp_at(row: &duckdb::Row, idx: usize) -> duckdb::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn query_ids(conn: &Connection, sql: &str, key: &str) -> Result<Vec<Uuid>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map([key], |row| uuid_at(row, 0))?
        .collect::<duckdb::Result<Vec<_>>>()?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> DuckDbRepository {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.ensure_schema().unwrap();
        repo
    }

    fn account(email: &str) -> Account {
        Account::new(email, "1234567").unwrap()
    }

    #[test]
    fn test_account_roundtrip() {
        let repo = repo();
        let account = account("test@email.com");
        repo.insert_account(&account).unwrap();

        let by_id = repo.get_account_by_id(account.id).unwrap().unwrap();
        assert_eq!(by_id.email, "test@email.com");
        assert!(by_id.check_password("1234567"));
        assert!(by_id.is_active);

        let by_email = repo.get_account_by_email("test@email.com").unwrap().unwrap();
        assert_eq!(by_email.id, account.id);
        assert!(repo.get_account_by_email("other@email.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let repo = repo();
        repo.insert_account(&account("dup@email.com")).unwrap();

        let err = repo.insert_account(&account("dup@email.com")).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);
    }

    #[test]
    fn test_update_account_flags() {
        let repo = repo();
        let mut account = account("flags@email.com");
        repo.insert_account(&account).unwrap();

        account.is_staff = true;
        account.name = "Flag Tester".to_string();
        repo.update_account(&account).unwrap();

        let stored = repo.get_account_by_id(account.id).unwrap().unwrap();
        assert!(stored.is_staff);
        assert_eq!(stored.name, "Flag Tester");
    }

    #[test]
    fn test_update_missing_account_is_not_found() {
        let repo = repo();
        let err = repo.update_account(&account("ghost@email.com")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_recipe_roundtrip_with_links() {
        let repo = repo();
        let owner = account("chef@email.com");
        repo.insert_account(&owner).unwrap();

        let tag = Tag::new(owner.id, "Vegan");
        let ingredient = Ingredient::new(owner.id, "Salt");
        repo.insert_tag(&tag).unwrap();
        repo.insert_ingredient(&ingredient).unwrap();

        let mut recipe = Recipe::new(owner.id, "Soup", 30, Decimal::new(1250, 2));
        recipe.tags = vec![tag.id];
        recipe.ingredients = vec![ingredient.id];
        repo.insert_recipe(&recipe).unwrap();

        let stored = repo.get_recipe(recipe.id).unwrap().unwrap();
        assert_eq!(stored.title, "Soup");
        assert_eq!(stored.time_minutes, 30);
        assert_eq!(stored.price, Decimal::new(1250, 2));
        assert_eq!(stored.tags, vec![tag.id]);
        assert_eq!(stored.ingredients, vec![ingredient.id]);
    }

    #[test]
    fn test_price_keeps_scale() {
        let repo = repo();
        let owner = account("price@email.com");
        repo.insert_account(&owner).unwrap();

        let recipe = Recipe::new(owner.id, "Toast", 5, Decimal::new(500, 2));
        repo.insert_recipe(&recipe).unwrap();

        let stored = repo.get_recipe(recipe.id).unwrap().unwrap();
        assert_eq!(stored.price.to_string(), "5.00");
    }

    #[test]
    fn test_delete_recipe_removes_links() {
        let repo = repo();
        let owner = account("del@email.com");
        repo.insert_account(&owner).unwrap();
        let tag = Tag::new(owner.id, "Quick");
        repo.insert_tag(&tag).unwrap();

        let mut recipe = Recipe::new(owner.id, "Eggs", 10, Decimal::new(300, 2));
        recipe.tags = vec![tag.id];
        repo.insert_recipe(&recipe).unwrap();

        assert!(repo.delete_recipe(recipe.id).unwrap());
        assert!(repo.get_recipe(recipe.id).unwrap().is_none());
        assert!(repo.get_tags_for_user(owner.id, true).unwrap().is_empty());
        assert!(!repo.delete_recipe(recipe.id).unwrap());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
