//! Recipe command - create, browse and edit recipes

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use recipebox_core::services::{NewRecipe, RecipeDetail, RecipeUpdate};
use recipebox_core::{Recipe, RecipeFilter};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{get_context, owner, parse_ids};
use crate::output;

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// Create a recipe
    New {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Recipe title
        #[arg(long)]
        title: String,
        /// Preparation time in minutes
        #[arg(long)]
        time_minutes: u32,
        /// Price (e.g. 5.00)
        #[arg(long)]
        price: Decimal,
        /// Link to the original recipe
        #[arg(long)]
        link: Option<String>,
        /// Tag IDs to attach
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Ingredient IDs to attach
        #[arg(long, value_delimiter = ',')]
        ingredients: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recipes, newest first
    List {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Only recipes carrying any of these tag IDs
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Only recipes using any of these ingredient IDs
        #[arg(long, value_delimiter = ',')]
        ingredients: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with its tags and ingredients
    Show {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Recipe ID
        id: Uuid,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change fields of a recipe; omitted fields are kept
    Update {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Recipe ID
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        time_minutes: Option<u32>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        link: Option<String>,
        /// Replace tags with these IDs
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// Replace ingredients with these IDs
        #[arg(long, value_delimiter = ',')]
        ingredients: Option<Vec<String>>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recipe
    Delete {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Recipe ID
        id: Uuid,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Attach an image file to a recipe
    UploadImage {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Recipe ID
        id: Uuid,
        /// Image file to upload
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl RecipeCommands {
    pub fn name(&self) -> &'static str {
        match self {
            RecipeCommands::New { .. } => "new",
            RecipeCommands::List { .. } => "list",
            RecipeCommands::Show { .. } => "show",
            RecipeCommands::Update { .. } => "update",
            RecipeCommands::Delete { .. } => "delete",
            RecipeCommands::UploadImage { .. } => "upload-image",
        }
    }
}

pub fn run(command: RecipeCommands) -> Result<()> {
    match command {
        RecipeCommands::New {
            user,
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
            json,
        } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;

            let mut input = NewRecipe::new(title, time_minutes, price);
            input.link = link.unwrap_or_default();
            input.tags = parse_ids(&tags)?;
            input.ingredients = parse_ids(&ingredients)?;

            let recipe = ctx.recipe_service.create(&account, input)?;
            if json {
                return output::json(&recipe);
            }
            output::success(&format!("Created recipe {}", recipe));
            println!("  ID: {}", recipe.id);
        }
        RecipeCommands::List {
            user,
            tags,
            ingredients,
            json,
        } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;
            let filter = RecipeFilter {
                tags: parse_ids(&tags)?,
                ingredients: parse_ids(&ingredients)?,
            };

            let recipes = ctx.recipe_service.list(&account, &filter)?;
            if json {
                return output::json(&recipes);
            }
            print_recipes(&recipes);
        }
        RecipeCommands::Show { user, id, json } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;
            let detail = ctx.recipe_service.get(&account, id)?;
            if json {
                return output::json(&detail);
            }
            print_detail(&detail);
        }
        RecipeCommands::Update {
            user,
            id,
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
            json,
        } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;
            let update = RecipeUpdate {
                title,
                time_minutes,
                price,
                link,
                tags: tags.as_deref().map(parse_ids).transpose()?,
                ingredients: ingredients.as_deref().map(parse_ids).transpose()?,
            };

            let recipe = ctx.recipe_service.update(&account, id, update)?;
            if json {
                return output::json(&recipe);
            }
            output::success(&format!("Updated recipe {}", recipe));
        }
        RecipeCommands::Delete { user, id, force } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;

            if !force {
                let detail = ctx.recipe_service.get(&account, id)?;
                if !Confirm::new()
                    .with_prompt(format!("Delete recipe '{}'?", detail.recipe))
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            ctx.recipe_service.delete(&account, id)?;
            output::success("Recipe deleted");
        }
        RecipeCommands::UploadImage {
            user,
            id,
            file,
            json,
        } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;

            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let recipe = ctx
                .recipe_service
                .upload_image(&account, id, &filename, &bytes)?;
            if json {
                return output::json(&recipe);
            }
            output::success(&format!(
                "Uploaded {} ({})",
                filename,
                output::format_size(bytes.len() as u64)
            ));
            if let Some(image) = &recipe.image {
                println!("  Stored at: {}", ctx.config.media_root.join(image).display());
            }
        }
    }

    Ok(())
}

fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("No recipes found.");
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Title", "Minutes", "Price", "Tags", "Ingredients"]);
    for recipe in recipes {
        table.add_row(vec![
            output::short_id(&recipe.id),
            recipe.title.clone(),
            recipe.time_minutes.to_string(),
            recipe.price.to_string(),
            recipe.tags.len().to_string(),
            recipe.ingredients.len().to_string(),
        ]);
    }
    println!("{}", table);
}

fn print_detail(detail: &RecipeDetail) {
    let recipe = &detail.recipe;
    println!("{}", recipe.title.bold());
    println!("  ID:       {}", recipe.id);
    println!("  Time:     {} min", recipe.time_minutes);
    println!("  Price:    {}", recipe.price);
    if !recipe.link.is_empty() {
        println!("  Link:     {}", recipe.link);
    }
    if let Some(image) = &recipe.image {
        println!("  Image:    {}", image);
    }

    let names = |items: Vec<String>| {
        if items.is_empty() {
            "-".dimmed().to_string()
        } else {
            items.join(", ")
        }
    };
    println!(
        "  Tags:     {}",
        names(detail.tags.iter().map(|t| t.name.clone()).collect())
    );
    println!(
        "  Contains: {}",
        names(detail.ingredients.iter().map(|i| i.name.clone()).collect())
    );
}
