//! Recipe domain model

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recipe owned by a user
///
/// `tags` and `ingredients` hold ids of records owned by the same user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: u32,
    pub price: Decimal,
    /// Optional external link, empty when unset
    pub link: String,
    /// Path of the uploaded image relative to the media root
    pub image: Option<String>,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a new recipe with required fields
    pub fn new(user_id: Uuid, title: impl Into<String>, time_minutes: u32, price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            time_minutes,
            price,
            link: String::new(),
            image: None,
            tags: Vec::new(),
            ingredients: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_display_is_title() {
        let recipe = Recipe::new(
            Uuid::new_v4(),
            "Steak and muchrooom sauce",
            5,
            Decimal::new(500, 2),
        );
        assert_eq!(recipe.to_string(), "Steak and muchrooom sauce");
        assert!(recipe.image.is_none());
        assert!(recipe.link.is_empty());
    }
}
