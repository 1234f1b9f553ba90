//! Ingredient command - create and list a user's ingredients

use anyhow::Result;
use clap::Subcommand;

use super::{get_context, owner};
use crate::output;

#[derive(Subcommand)]
pub enum IngredientCommands {
    /// Create an ingredient
    Add {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Ingredient name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List ingredients in descending name order
    List {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Only ingredients used by at least one recipe
        #[arg(long)]
        assigned_only: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl IngredientCommands {
    pub fn name(&self) -> &'static str {
        match self {
            IngredientCommands::Add { .. } => "add",
            IngredientCommands::List { .. } => "list",
        }
    }
}

pub fn run(command: IngredientCommands) -> Result<()> {
    match command {
        IngredientCommands::Add { user, name, json } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;
            let ingredient = ctx.ingredient_service.create(&account, &name)?;

            if json {
                return output::json(&ingredient);
            }
            output::success(&format!("Created ingredient {} ({})", ingredient, ingredient.id));
        }
        IngredientCommands::List {
            user,
            assigned_only,
            json,
        } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;
            let ingredients = ctx.ingredient_service.list(&account, assigned_only)?;

            if json {
                return output::json(&ingredients);
            }
            if ingredients.is_empty() {
                println!("No ingredients found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name"]);
            for ingredient in &ingredients {
                table.add_row(vec![ingredient.id.to_string(), ingredient.name.clone()]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
