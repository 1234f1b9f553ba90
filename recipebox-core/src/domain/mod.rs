//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod ingredient;
pub mod password;
mod recipe;
pub mod result;
mod tag;

pub use account::Account;
pub use ingredient::Ingredient;
pub use recipe::Recipe;
pub use tag::Tag;
