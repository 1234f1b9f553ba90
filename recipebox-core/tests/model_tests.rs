//! Model tests
//!
//! Account creation rules, string representations and the recipe image
//! upload path, exercised through the public API over in-memory DuckDB.
//!
//! Run with: cargo test --test model_tests

use std::sync::Arc;

use rust_decimal::Decimal;

use recipebox_core::adapters::duckdb::DuckDbRepository;
use recipebox_core::adapters::identifier::FixedIdentifier;
use recipebox_core::adapters::media::LocalMediaStorage;
use recipebox_core::domain::Account;
use recipebox_core::ports::Repository;
use recipebox_core::services::{
    AccountOptions, AccountService, IngredientService, NewRecipe, RecipeService, TagService,
    UploadPathGenerator,
};
use recipebox_core::Error;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_test_repo() -> Arc<DuckDbRepository> {
    let repo = DuckDbRepository::in_memory().expect("Failed to open in-memory database");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

fn sample_user(repo: &Arc<DuckDbRepository>) -> Account {
    AccountService::new(repo.clone())
        .create_user(Some("test@email.com"), "1234567", AccountOptions::default())
        .unwrap()
}

// ============================================================================
// Account Factory
// ============================================================================

#[test]
fn test_create_user_with_email_successful() {
    let repo = create_test_repo();
    let accounts = AccountService::new(repo.clone());
    let email = "test@carousell.com";
    let password = "1234567";

    let user = accounts
        .create_user(Some(email), password, AccountOptions::default())
        .unwrap();

    assert_eq!(user.email, email);
    assert!(user.check_password(password));

    // What was persisted matches what was returned
    let stored = repo.get_account_by_email(email).unwrap().unwrap();
    assert_eq!(stored.id, user.id);
    assert!(stored.check_password(password));
    assert_ne!(stored.password_hash, password);
}

#[test]
fn test_new_user_email_normalized() {
    let repo = create_test_repo();
    let email = "test@carousell.COM";

    let user = AccountService::new(repo)
        .create_user(Some(email), "1234567", AccountOptions::default())
        .unwrap();

    assert_eq!(user.email, email.to_lowercase());
    assert_eq!(user.email, "test@carousell.com");
}

#[test]
fn test_new_user_invalid_email() {
    let repo = create_test_repo();
    let result = AccountService::new(repo.clone()).create_user(None, "test123", AccountOptions::default());

    assert!(matches!(result, Err(Error::Validation(_))));
    // Nothing was persisted
    assert!(repo.get_account_by_email("").unwrap().is_none());
}

#[test]
fn test_create_new_superuser() {
    let repo = create_test_repo();
    let user = AccountService::new(repo)
        .create_superuser(Some("test@carousell.com"), "1234567")
        .unwrap();

    assert!(user.is_superuser);
    assert!(user.is_staff);
}

#[test]
fn test_options_override_flags() {
    let repo = create_test_repo();
    let user = AccountService::new(repo)
        .create_user(
            Some("staff@carousell.com"),
            "1234567",
            AccountOptions {
                is_staff: true,
                ..Default::default()
            },
        )
        .unwrap();

    assert!(user.is_staff);
    assert!(!user.is_superuser);
}

// ============================================================================
// String representations
// ============================================================================

#[test]
fn test_tag_str() {
    let repo = create_test_repo();
    let user = sample_user(&repo);

    let tag = TagService::new(repo).create(&user, "Tester1").unwrap();

    assert_eq!(tag.to_string(), tag.name);
}

#[test]
fn test_ingredient_str() {
    let repo = create_test_repo();
    let user = sample_user(&repo);

    let ingredient = IngredientService::new(repo).create(&user, "Cucumber").unwrap();

    assert_eq!(ingredient.to_string(), ingredient.name);
}

#[test]
fn test_recipe_str() {
    let repo = create_test_repo();
    let user = sample_user(&repo);
    let media_dir = tempfile::tempdir().unwrap();
    let recipes = RecipeService::new(
        repo,
        Arc::new(LocalMediaStorage::new(media_dir.path())),
        UploadPathGenerator::random(),
    );

    let recipe = recipes
        .create(
            &user,
            NewRecipe::new("Steak and muchrooom sauce", 5, Decimal::new(500, 2)),
        )
        .unwrap();

    assert_eq!(recipe.to_string(), recipe.title);
}

// ============================================================================
// Upload path
// ============================================================================

#[test]
fn test_recipe_file_name_uuid() {
    let generator = UploadPathGenerator::new(Arc::new(FixedIdentifier::new("test-uuid")));

    let file_path = generator.recipe_image_file_path(None, "myimage.jpg");

    let exp_path = format!("uploads/recipe/{}.jpg", "test-uuid");
    assert_eq!(file_path, exp_path);
}
