//! Config command - show and change settings

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use recipebox_core::config::Config;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change where uploaded images are stored
    SetMediaRoot {
        /// Directory (relative paths resolve against the data directory)
        path: PathBuf,
    },
    /// Turn event logging on or off
    SetLogging {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

impl ConfigCommands {
    pub fn name(&self) -> &'static str {
        match self {
            ConfigCommands::Show { .. } => "show",
            ConfigCommands::SetMediaRoot { .. } => "set-media-root",
            ConfigCommands::SetLogging { .. } => "set-logging",
        }
    }
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let mut config = Config::load(&data_dir)?;

    match command {
        ConfigCommands::Show { json } => {
            if json {
                return output::json(&serde_json::json!({
                    "data_dir": data_dir.to_string_lossy(),
                    "media_root": config.media_root.to_string_lossy(),
                    "logging_enabled": config.logging_enabled,
                }));
            }
            println!("{}", "Recipebox Settings".bold());
            println!("  Data directory: {}", data_dir.display());
            println!("  Media root:     {}", config.media_root.display());
            println!("  Logging:        {}", on_off(config.logging_enabled));
        }
        ConfigCommands::SetMediaRoot { path } => {
            config.set_media_root(&data_dir, path);
            config.save(&data_dir)?;
            output::success(&format!("Media root set to {}", config.media_root.display()));
        }
        ConfigCommands::SetLogging { enabled } => {
            config.logging_enabled = enabled;
            config.save(&data_dir)?;
            output::success(&format!("Logging {}", on_off(enabled)));
        }
    }

    if std::env::var_os("RECIPEBOX_MEDIA_ROOT").is_some()
        || std::env::var_os("RECIPEBOX_LOGGING").is_some()
    {
        output::info("Environment overrides are active (RECIPEBOX_MEDIA_ROOT / RECIPEBOX_LOGGING)");
    }

    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
