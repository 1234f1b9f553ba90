//! Recipebox CLI - recipes, tags and ingredients in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, ingredient, logs, recipe, tag, user};
use recipebox_core::LogEvent;

/// Recipebox - recipes, tags and ingredients in your terminal
#[derive(Parser)]
#[command(name = "recipebox", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and manage user accounts
    User {
        #[command(subcommand)]
        command: user::UserCommands,
    },

    /// Create and list tags
    Tag {
        #[command(subcommand)]
        command: tag::TagCommands,
    },

    /// Create and list ingredients
    Ingredient {
        #[command(subcommand)]
        command: ingredient::IngredientCommands,
    },

    /// Create, browse and edit recipes
    Recipe {
        #[command(subcommand)]
        command: recipe::RecipeCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Command path recorded in the event log
    fn name(&self) -> String {
        match self {
            Commands::User { command } => format!("user {}", command.name()),
            Commands::Tag { command } => format!("tag {}", command.name()),
            Commands::Ingredient { command } => format!("ingredient {}", command.name()),
            Commands::Recipe { command } => format!("recipe {}", command.name()),
            Commands::Config { command } => format!("config {}", command.name()),
            Commands::Logs { .. } => "logs".to_string(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Inspecting the log should not add to it
    let logger = match cli.command {
        Commands::Logs { .. } => None,
        _ => commands::get_logger(),
    };
    let command_name = cli.command.name();
    commands::log_event(
        &logger,
        LogEvent::new("command_executed").with_command(&command_name),
    );

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(&command_name)
                    .with_error(error_kind(&e)),
            );
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::User { command } => user::run(command),
        Commands::Tag { command } => tag::run(command),
        Commands::Ingredient { command } => ingredient::run(command),
        Commands::Recipe { command } => recipe::run(command),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}

/// Error category safe to store in the log (messages may carry emails or titles)
fn error_kind(err: &anyhow::Error) -> &'static str {
    use recipebox_core::Error;
    match err.downcast_ref::<Error>() {
        Some(Error::Validation(_)) => "validation",
        Some(Error::NotFound(_)) => "not_found",
        Some(Error::Conflict(_)) => "conflict",
        Some(Error::Database(_)) => "database",
        Some(Error::Storage(_)) | Some(Error::Io(_)) => "storage",
        Some(_) => "internal",
        None => "unexpected",
    }
}
