//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account;
mod ingredient;
pub mod logging;
pub mod migration;
mod recipe;
mod tag;
mod upload;

pub use account::{AccountOptions, AccountService, ProfileUpdate};
pub use ingredient::IngredientService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use recipe::{NewRecipe, RecipeDetail, RecipeService, RecipeUpdate};
pub use tag::TagService;
pub use upload::{UploadPathGenerator, RECIPE_UPLOAD_DIR};
