//! User command - create and manage accounts

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Password;
use recipebox_core::services::{AccountOptions, ProfileUpdate};
use recipebox_core::Account;

use super::{get_context, owner};
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a regular account
    Create {
        /// Email address
        #[arg(long)]
        email: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "RECIPEBOX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an account with staff and superuser privileges
    Createsuperuser {
        /// Email address
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "RECIPEBOX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show an account
    Show {
        /// Email address
        #[arg(long)]
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change name or password
    Update {
        /// Email address
        #[arg(long)]
        email: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New password
        #[arg(long)]
        password: Option<String>,
    },
}

impl UserCommands {
    pub fn name(&self) -> &'static str {
        match self {
            UserCommands::Create { .. } => "create",
            UserCommands::Createsuperuser { .. } => "createsuperuser",
            UserCommands::Show { .. } => "show",
            UserCommands::Update { .. } => "update",
        }
    }
}

pub fn run(command: UserCommands) -> Result<()> {
    match command {
        UserCommands::Create {
            email,
            name,
            password,
            json,
        } => {
            let ctx = get_context()?;
            let password = read_password(password)?;
            let options = AccountOptions {
                name: name.unwrap_or_default(),
                ..Default::default()
            };
            let account = ctx
                .account_service
                .create_user(Some(&email), &password, options)?;
            print_created(&account, json)
        }
        UserCommands::Createsuperuser {
            email,
            password,
            json,
        } => {
            let ctx = get_context()?;
            let password = read_password(password)?;
            let account = ctx.account_service.create_superuser(Some(&email), &password)?;
            print_created(&account, json)
        }
        UserCommands::Show { email, json } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &email)?;
            if json {
                return output::json(&account);
            }
            print_account(&account);
            Ok(())
        }
        UserCommands::Update {
            email,
            name,
            password,
        } => {
            let ctx = get_context()?;
            let account = owner(&ctx, &email)?;
            let updated = ctx
                .account_service
                .update_profile(account.id, ProfileUpdate { name, password })?;
            output::success(&format!("Updated {}", updated));
            Ok(())
        }
    }
}

fn read_password(given: Option<String>) -> Result<String> {
    if let Some(p) = given {
        return Ok(p);
    }
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;
    Ok(password)
}

fn print_created(account: &Account, json: bool) -> Result<()> {
    if json {
        return output::json(account);
    }
    output::success(&format!("Created account {}", account));
    print_account(account);
    Ok(())
}

fn print_account(account: &Account) {
    println!("  {}    {}", "ID:".bold(), account.id);
    println!("  {}  {}", "Email:".bold(), account.email);
    if !account.name.is_empty() {
        println!("  {}   {}", "Name:".bold(), account.name);
    }
    println!("  {}  {}", "Staff:".bold(), account.is_staff);
    println!("  {}  {}", "Admin:".bold(), account.is_superuser);
    println!(
        "  {} {}",
        "Joined:".bold(),
        account.created_at.format("%Y-%m-%d %H:%M")
    );
}
