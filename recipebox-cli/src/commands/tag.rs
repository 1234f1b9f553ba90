//! Tag command - create and list a user's tags

use anyhow::Result;
use clap::Subcommand;

use super::{get_context, owner};
use crate::output;

#[derive(Subcommand)]
pub enum TagCommands {
    /// Create a tag
    Add {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Tag name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tags in descending name order
    List {
        /// Owner's email
        #[arg(long)]
        user: String,
        /// Only tags attached to at least one recipe
        #[arg(long)]
        assigned_only: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl TagCommands {
    pub fn name(&self) -> &'static str {
        match self {
            TagCommands::Add { .. } => "add",
            TagCommands::List { .. } => "list",
        }
    }
}

pub fn run(command: TagCommands) -> Result<()> {
    match command {
        TagCommands::Add { user, name, json } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;
            let tag = ctx.tag_service.create(&account, &name)?;

            if json {
                return output::json(&tag);
            }
            output::success(&format!("Created tag {} ({})", tag, tag.id));
        }
        TagCommands::List {
            user,
            assigned_only,
            json,
        } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &user)?;
            let tags = ctx.tag_service.list(&account, assigned_only)?;

            if json {
                return output::json(&tags);
            }
            if tags.is_empty() {
                println!("No tags found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name"]);
            for tag in &tags {
                table.add_row(vec![tag.id.to_string(), tag.name.clone()]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
