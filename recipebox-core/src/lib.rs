//! Recipebox Core - Business logic for recipe management
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Account, Tag, Ingredient, Recipe)
//! - **ports**: Trait definitions for external dependencies (Repository, MediaStorage, IdentifierSource)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, local filesystem, UUIDs)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbRepository;
use adapters::media::LocalMediaStorage;
use config::Config;
use ports::Repository;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Account, Ingredient, Recipe, Tag};
pub use ports::RecipeFilter;
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Recipebox operations
///
/// This is the primary entry point for all business logic. It holds
/// the database connection, configuration, and all services.
///
/// Programs embedding the library record their events under
/// [`EntryPoint::Embedded`]:
///
/// ```no_run
/// use std::path::Path;
///
/// use recipebox_core::services::AccountOptions;
/// use recipebox_core::{EntryPoint, LogEvent, LoggingService, RecipeboxContext};
///
/// fn main() -> anyhow::Result<()> {
///     let data_dir = Path::new("/var/lib/recipebox");
///     let ctx = RecipeboxContext::new(data_dir)?;
///     let logger = LoggingService::new(data_dir, EntryPoint::Embedded, "1.0.0")?;
///
///     ctx.account_service
///         .create_user(Some("chef@example.com"), "secret", AccountOptions::default())?;
///     logger.log(LogEvent::new("record_created").with_entity("account"))?;
///     Ok(())
/// }
/// ```
pub struct RecipeboxContext {
    pub config: Config,
    pub repository: Arc<dyn Repository>,
    pub account_service: AccountService,
    pub tag_service: TagService,
    pub ingredient_service: IngredientService,
    pub recipe_service: RecipeService,
}

impl RecipeboxContext {
    /// Open the context rooted at `data_dir`
    ///
    /// Opens (or creates) `recipebox.duckdb`, applies migrations and wires
    /// the services to it.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let db_path = data_dir.join("recipebox.duckdb");
        let repository = DuckDbRepository::new(&db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;
        Self::with_repository(config, Arc::new(repository))
    }

    /// Build a context over an already opened repository
    pub fn with_repository(config: Config, repository: Arc<dyn Repository>) -> Result<Self> {
        repository.ensure_schema().context("Failed to apply migrations")?;

        let media = Arc::new(LocalMediaStorage::new(config.media_root.clone()));
        let account_service = AccountService::new(Arc::clone(&repository));
        let tag_service = TagService::new(Arc::clone(&repository));
        let ingredient_service = IngredientService::new(Arc::clone(&repository));
        let recipe_service = RecipeService::new(
            Arc::clone(&repository),
            media,
            UploadPathGenerator::random(),
        );

        Ok(Self {
            config,
            repository,
            account_service,
            tag_service,
            ingredient_service,
            recipe_service,
        })
    }
}
