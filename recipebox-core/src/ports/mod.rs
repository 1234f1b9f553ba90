//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod identifier;
mod media;
mod repository;

pub use identifier::IdentifierSource;
pub use media::MediaStorage;
pub use repository::{RecipeFilter, Repository};
